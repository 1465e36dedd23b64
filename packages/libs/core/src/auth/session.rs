//! 세션 자격증명 (SigV4 스타일)
//!
//! access key / secret key / session token 세 쌍을 발급합니다.
//! 세션 토큰은 스코프 정책을 claim으로 품고 있어서, 리소스 서버는
//! DB 조회 없이 토큰만으로 요청을 인가할 수 있습니다.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::claims::SessionClaims;
use super::envelope::TokenKeys;
use super::token::TokenConfig;
use crate::crypto::random_urlsafe;
use crate::error::{Error, Result};
use crate::permissions::{PolicyBuilder, PolicyDocument, ScopeRequest};

/// access key 접두사
pub const ACCESS_KEY_PREFIX: &str = "AKIA";

const ACCESS_KEY_RANDOM_BYTES: usize = 15;
const ACCESS_KEY_SUFFIX_LEN: usize = 16;
const SECRET_KEY_RANDOM_BYTES: usize = 30;

/// 세션 자격증명 수명 (갱신 불가)
pub fn session_ttl() -> Duration {
    Duration::hours(12)
}

/// 발급된 세션 자격증명
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// 검증된 세션 토큰에서 꺼낸 권한
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGrant {
    pub org_id: String,
    pub policy: PolicyDocument,
    pub expires_at: DateTime<Utc>,
}

/// 세션 자격증명 발급기
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    keys: Arc<TokenKeys>,
    config: TokenConfig,
    builder: PolicyBuilder,
}

impl CredentialIssuer {
    pub fn new(keys: Arc<TokenKeys>, config: TokenConfig, builder: PolicyBuilder) -> Self {
        Self {
            keys,
            config: config.normalized(),
            builder,
        }
    }

    pub fn builder(&self) -> &PolicyBuilder {
        &self.builder
    }

    pub fn issue(&self, request: &ScopeRequest) -> Result<SessionCredential> {
        self.issue_at(request, Utc::now())
    }

    /// 지정 시각 기준으로 발급
    ///
    /// 정책 생성이나 서명에 실패하면 아무것도 반환하지 않습니다.
    pub fn issue_at(
        &self,
        request: &ScopeRequest,
        now: DateTime<Utc>,
    ) -> Result<SessionCredential> {
        let policy = self.builder.build(request)?;
        let policy_json = policy.to_json()?;

        let access_key = generate_access_key()?;
        let secret_key = random_urlsafe(SECRET_KEY_RANDOM_BYTES)?;

        let issued_at = now.trunc_subsecs(0);
        let org_id = request.org_id.trim().to_string();
        let claims = SessionClaims {
            iss: self.config.issuer.clone(),
            sub: org_id.clone(),
            iat: issued_at,
            exp: issued_at + session_ttl(),
            org_id,
            policy: policy_json,
        };

        let session_token = self.keys.seal(&claims)?;
        tracing::info!(
            org_id = %claims.org_id,
            %access_key,
            statements = policy.statements.len(),
            "session credential issued"
        );

        Ok(SessionCredential {
            access_key,
            secret_key,
            session_token,
            expires_at: claims.exp,
        })
    }

    /// 세션 토큰 검증 후 조직 ID와 정책 추출
    pub fn validate(&self, session_token: &str) -> Result<SessionGrant> {
        let claims = self.keys.open::<SessionClaims>(session_token, &self.config)?;

        let policy = PolicyDocument::from_json(&claims.policy).map_err(|e| {
            tracing::warn!(
                org_id = %claims.org_id,
                error = %e,
                "signed session token carries unreadable policy"
            );
            Error::InvalidCredential {
                reason: "embedded policy is invalid".to_string(),
            }
        })?;

        Ok(SessionGrant {
            org_id: claims.org_id,
            policy,
            expires_at: claims.exp,
        })
    }
}

fn generate_access_key() -> Result<String> {
    let encoded = random_urlsafe(ACCESS_KEY_RANDOM_BYTES)?;
    let suffix: String = encoded.chars().take(ACCESS_KEY_SUFFIX_LEN).collect();
    Ok(format!("{ACCESS_KEY_PREFIX}{suffix}"))
}
