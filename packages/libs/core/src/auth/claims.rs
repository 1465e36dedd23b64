//! 토큰 Claims
//!
//! 신원 토큰과 세션 자격증명 토큰의 페이로드 구조입니다.
//! 시각 claim은 초 단위 Unix timestamp로 직렬화됩니다.

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use jsonwebtoken::Validation;
use serde::{Deserialize, Serialize};

use super::envelope::{base_validation, EnvelopeClaims};
use super::token::TokenConfig;
use crate::error::{Error, Result};

/// 신원 토큰 Claims
///
/// 비밀번호 로그인 후 발급되는 사용자 토큰의 내용입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// 발급자
    pub iss: String,

    /// Subject (= user_id)
    pub sub: String,

    /// 대상
    pub aud: String,

    /// 발급 시각
    #[serde(with = "ts_seconds")]
    pub iat: DateTime<Utc>,

    /// 유효 시작 시각 (발급 시각 - 10초)
    #[serde(with = "ts_seconds")]
    pub nbf: DateTime<Utc>,

    /// 만료 시각
    #[serde(with = "ts_seconds")]
    pub exp: DateTime<Utc>,

    /// JWT ID (발급마다 고유)
    pub jti: String,

    /// 사용자 ID
    #[serde(default)]
    pub user_id: String,

    /// 이메일
    #[serde(default)]
    pub email: String,
}

impl EnvelopeClaims for IdentityClaims {
    fn validation(config: &TokenConfig) -> Validation {
        let mut validation = base_validation(config);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation
    }

    fn check(&self, config: &TokenConfig) -> Result<()> {
        if self.iat > Utc::now() + config.leeway {
            return Err(Self::rejected("token issued in the future".to_string()));
        }

        let mut missing = Vec::new();
        if self.user_id.trim().is_empty() {
            missing.push("user_id");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }

        if !missing.is_empty() {
            tracing::warn!(jti = %self.jti, ?missing, "signed identity token is missing claims");
            return Err(Error::MissingClaims {
                claims: missing.join(", "),
            });
        }

        Ok(())
    }

    fn rejected(reason: String) -> Error {
        Error::InvalidToken { reason }
    }
}

/// 세션 자격증명 Claims
///
/// 스코프 정책을 직렬화된 JSON 문자열로 품고 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 발급자
    pub iss: String,

    /// Subject (= org_id)
    pub sub: String,

    /// 발급 시각
    #[serde(with = "ts_seconds")]
    pub iat: DateTime<Utc>,

    /// 만료 시각
    #[serde(with = "ts_seconds")]
    pub exp: DateTime<Utc>,

    /// 조직 ID
    #[serde(default)]
    pub org_id: String,

    /// 정책 문서 (compact JSON)
    #[serde(default)]
    pub policy: String,
}

impl EnvelopeClaims for SessionClaims {
    fn validation(config: &TokenConfig) -> Validation {
        let mut validation = base_validation(config);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }

    fn check(&self, _config: &TokenConfig) -> Result<()> {
        let mut missing = Vec::new();
        if self.org_id.trim().is_empty() {
            missing.push("org_id");
        }
        if self.policy.trim().is_empty() {
            missing.push("policy");
        }

        if !missing.is_empty() {
            tracing::warn!(sub = %self.sub, ?missing, "signed session token is missing claims");
            return Err(Error::MissingClaims {
                claims: missing.join(", "),
            });
        }

        Ok(())
    }

    fn rejected(reason: String) -> Error {
        Error::InvalidCredential { reason }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn identity(user_id: &str, email: &str) -> IdentityClaims {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        IdentityClaims {
            iss: "clove-auth".to_string(),
            sub: user_id.to_string(),
            aud: "clove-api".to_string(),
            iat: now,
            nbf: now - Duration::seconds(10),
            exp: now + Duration::minutes(15),
            jti: "01HX".to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_timestamps_serialize_as_seconds() {
        let claims = identity("user_1", "a@example.com");
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["iat"], 1_700_000_000);
        assert_eq!(value["nbf"], 1_699_999_990);
        assert_eq!(value["exp"], 1_700_000_900);
        assert_eq!(value["user_id"], "user_1");
    }

    #[test]
    fn test_identity_check_requires_user_and_email() {
        let config = TokenConfig::default();
        assert!(identity("user_1", "a@example.com").check(&config).is_ok());

        let err = identity("user_1", "  ").check(&config).unwrap_err();
        match err {
            Error::MissingClaims { claims } => assert_eq!(claims, "email"),
            other => panic!("expected MissingClaims, got {other:?}"),
        }

        let err = identity("", "").check(&config).unwrap_err();
        assert!(matches!(err, Error::MissingClaims { ref claims } if claims == "user_id, email"));
    }

    #[test]
    fn test_missing_custom_claims_deserialize_empty() {
        let json = r#"{"iss":"clove-auth","sub":"org_1","iat":1700000000,"exp":1700043200}"#;
        let claims: SessionClaims = serde_json::from_str(json).unwrap();
        assert!(claims.org_id.is_empty());
        assert!(matches!(
            claims.check(&TokenConfig::default()),
            Err(Error::MissingClaims { .. })
        ));
    }

    #[test]
    fn test_rejected_error_kinds() {
        assert!(matches!(
            IdentityClaims::rejected("x".to_string()),
            Error::InvalidToken { .. }
        ));
        assert!(matches!(
            SessionClaims::rejected("x".to_string()),
            Error::InvalidCredential { .. }
        ));
    }
}
