//! 신원 토큰 발급 및 검증
//!
//! RS256 서명 JWT입니다. 발급 시각은 초 단위로 잘라서 `exp - iat`가
//! 정확히 TTL이 되도록 합니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;
use ulid::Ulid;

use super::claims::IdentityClaims;
use super::envelope::TokenKeys;
use crate::error::{Error, Result};

/// 기본 발급자
pub const DEFAULT_ISSUER: &str = "clove-auth";

/// 기본 대상
pub const DEFAULT_AUDIENCE: &str = "clove-api";

/// `nbf`를 발급 시각보다 앞당기는 폭 (초)
const NOT_BEFORE_SKEW_SECS: i64 = 10;

/// 토큰 설정
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub leeway: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            access_ttl: Duration::minutes(15),
            leeway: Duration::seconds(30),
        }
    }
}

impl TokenConfig {
    /// 빈 값이나 0 이하 기간은 기본값으로 되돌림
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.issuer.trim().is_empty() {
            self.issuer = defaults.issuer;
        }
        if self.audience.trim().is_empty() {
            self.audience = defaults.audience;
        }
        if self.access_ttl <= Duration::zero() {
            self.access_ttl = defaults.access_ttl;
        }
        if self.leeway < Duration::zero() {
            self.leeway = defaults.leeway;
        }
        self
    }

    pub fn leeway_secs(&self) -> u64 {
        self.leeway.num_seconds().max(0) as u64
    }
}

/// 발급된 토큰
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// 신원 토큰 서비스
#[derive(Debug, Clone)]
pub struct TokenService {
    config: TokenConfig,
    keys: Arc<TokenKeys>,
}

impl TokenService {
    pub fn new(keys: Arc<TokenKeys>, config: TokenConfig) -> Self {
        Self {
            config: config.normalized(),
            keys,
        }
    }

    /// 현재 시각 기준으로 토큰 발급
    pub fn mint(&self, user_id: &str, email: &str) -> Result<IssuedToken> {
        self.mint_at(user_id, email, Utc::now())
    }

    /// 지정 시각 기준으로 토큰 발급
    pub fn mint_at(&self, user_id: &str, email: &str, now: DateTime<Utc>) -> Result<IssuedToken> {
        let user_id = user_id.trim();
        let email = email.trim();
        if user_id.is_empty() {
            return Err(Error::MissingField { field: "user_id" });
        }
        if email.is_empty() {
            return Err(Error::MissingField { field: "email" });
        }

        let issued_at = now.trunc_subsecs(0);
        let claims = IdentityClaims {
            iss: self.config.issuer.clone(),
            sub: user_id.to_string(),
            aud: self.config.audience.clone(),
            iat: issued_at,
            nbf: issued_at - Duration::seconds(NOT_BEFORE_SKEW_SECS),
            exp: issued_at + self.config.access_ttl,
            jti: Ulid::new().to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
        };

        let token = self.keys.seal(&claims)?;
        tracing::debug!(user_id, jti = %claims.jti, "identity token issued");

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// 토큰 검증 및 Claims 추출
    pub fn validate(&self, token: &str) -> Result<IdentityClaims> {
        self.keys.open::<IdentityClaims>(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::envelope::fixtures;

    fn service() -> TokenService {
        TokenService::new(fixtures::keys(), TokenConfig::default())
    }

    fn sample_claims(now: DateTime<Utc>) -> IdentityClaims {
        let now = now.trunc_subsecs(0);
        IdentityClaims {
            iss: DEFAULT_ISSUER.to_string(),
            sub: "user_1".to_string(),
            aud: DEFAULT_AUDIENCE.to_string(),
            iat: now,
            nbf: now - Duration::seconds(10),
            exp: now + Duration::minutes(15),
            jti: Ulid::new().to_string(),
            user_id: "user_1".to_string(),
            email: "a@example.com".to_string(),
        }
    }

    #[test]
    fn test_mint_then_validate() {
        let service = service();
        let issued = service.mint("user_1", "a@example.com").unwrap();
        let claims = service.validate(&issued.token).unwrap();

        assert_eq!(claims.user_id, "user_1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.sub, "user_1");
        assert_eq!(claims.iss, "clove-auth");
        assert_eq!(claims.aud, "clove-api");
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, Duration::minutes(15));
        assert_eq!(claims.iat - claims.nbf, Duration::seconds(10));
        assert!(claims.exp > Utc::now());
    }

    #[test]
    fn test_unique_token_ids() {
        let service = service();
        let now = Utc::now();
        let a = service.mint_at("user_1", "a@example.com", now).unwrap();
        let b = service.mint_at("user_1", "a@example.com", now).unwrap();
        assert_ne!(a.token, b.token);

        let a = service.validate(&a.token).unwrap();
        let b = service.validate(&b.token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_mint_requires_fields() {
        let service = service();
        assert!(matches!(
            service.mint(" ", "a@example.com"),
            Err(Error::MissingField { field: "user_id" })
        ));
        assert!(matches!(
            service.mint("user_1", ""),
            Err(Error::MissingField { field: "email" })
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let issued = service
            .mint_at("user_1", "a@example.com", Utc::now() - Duration::hours(1))
            .unwrap();

        let err = service.validate(&issued.token).unwrap_err();
        assert!(matches!(err, Error::InvalidToken { .. }));
        assert_eq!(err.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_expiry_within_leeway_accepted() {
        let service = service();
        // exp = now - 10s, leeway 30s
        let issued = service
            .mint_at(
                "user_1",
                "a@example.com",
                Utc::now() - Duration::minutes(15) - Duration::seconds(10),
            )
            .unwrap();
        assert!(service.validate(&issued.token).is_ok());
    }

    #[test]
    fn test_future_issued_at_rejected() {
        let service = service();
        let issued = service
            .mint_at("user_1", "a@example.com", Utc::now() + Duration::minutes(5))
            .unwrap();
        assert!(matches!(
            service.validate(&issued.token),
            Err(Error::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let issued = service().mint("user_1", "a@example.com").unwrap();
        let other = TokenService::new(fixtures::other_keys(), TokenConfig::default());
        assert!(matches!(
            other.validate(&issued.token),
            Err(Error::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_wrong_issuer_or_audience_rejected() {
        let issued = service().mint("user_1", "a@example.com").unwrap();

        let wrong_issuer = TokenService::new(
            fixtures::keys(),
            TokenConfig {
                issuer: "someone-else".to_string(),
                ..TokenConfig::default()
            },
        );
        assert!(wrong_issuer.validate(&issued.token).is_err());

        let wrong_audience = TokenService::new(
            fixtures::keys(),
            TokenConfig {
                audience: "other-api".to_string(),
                ..TokenConfig::default()
            },
        );
        assert!(wrong_audience.validate(&issued.token).is_err());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = service();
        let issued = service.mint("user_1", "a@example.com").unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        let signature = &mut parts[2];
        let mid = signature.len() / 2;
        let replacement = if &signature[mid..mid + 1] == "A" { "B" } else { "A" };
        signature.replace_range(mid..mid + 1, replacement);
        let tampered = parts.join(".");

        assert!(matches!(
            service.validate(&tampered),
            Err(Error::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_garbage_and_empty_tokens_rejected() {
        let service = service();
        for token in ["", "   ", "not-a-token", "a.b.c"] {
            assert!(
                matches!(service.validate(token), Err(Error::InvalidToken { .. })),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_signed_token_missing_claims_rejected() {
        let service = service();
        let mut claims = sample_claims(Utc::now());
        claims.email = String::new();
        let token = fixtures::keys().seal(&claims).unwrap();

        let err = service.validate(&token).unwrap_err();
        assert!(matches!(err, Error::MissingClaims { .. }));
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_key_id_header() {
        let keys = TokenKeys::from_pem(fixtures::PRIVATE_PEM, fixtures::PUBLIC_PEM)
            .unwrap()
            .with_key_id("key-2024");
        let service = TokenService::new(Arc::new(keys), TokenConfig::default());
        let issued = service.mint("user_1", "a@example.com").unwrap();

        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("key-2024"));
        assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
    }

    #[test]
    fn test_config_normalized() {
        let config = TokenConfig {
            issuer: " ".to_string(),
            audience: String::new(),
            access_ttl: Duration::zero(),
            leeway: Duration::seconds(-1),
        }
        .normalized();
        assert_eq!(config.issuer, DEFAULT_ISSUER);
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
        assert_eq!(config.access_ttl, Duration::minutes(15));
        assert_eq!(config.leeway_secs(), 30);
    }
}
