//! 서명 봉투 (RS256 JWT)
//!
//! 신원 토큰과 세션 자격증명 토큰은 같은 서명 형식을 쓰고 claims만 다릅니다.
//! claims 타입은 `EnvelopeClaims`를 구현해 자신의 검증 규칙과 필수 claim을 정의합니다.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::token::TokenConfig;
use crate::error::{Error, Result};

/// 유일하게 허용되는 서명 알고리즘
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// 서명 봉투에 담기는 claims
pub trait EnvelopeClaims: Serialize + DeserializeOwned {
    /// 서명/registered claim 검증 규칙
    fn validation(config: &TokenConfig) -> Validation;

    /// 서명 검증 통과 후 의미 검사 (필수 custom claim 등)
    fn check(&self, config: &TokenConfig) -> Result<()>;

    /// 암호학적 검증 실패를 나타내는 에러
    fn rejected(reason: String) -> Error;
}

/// 공통 검증 규칙: RS256 고정, issuer, leeway
pub fn base_validation(config: &TokenConfig) -> Validation {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.leeway = config.leeway_secs();
    validation.set_issuer(&[config.issuer.as_str()]);
    validation
}

/// 서명 키 쌍
///
/// 프로세스 시작 시 한 번 로드되고 이후 읽기 전용으로 공유됩니다.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    key_id: Option<String>,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// PEM 문자열에서 로드 (PKCS#1 / PKCS#8 개인키, SPKI / PKCS#1 공개키)
    ///
    /// 두 키가 한 쌍인지 서명-검증으로 확인합니다.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self> {
        let encoding = EncodingKey::from_rsa_pem(require_pem(private_pem, "private")?.as_bytes())
            .map_err(|e| key_error(format!("private key: {e}")))?;
        let decoding = DecodingKey::from_rsa_pem(require_pem(public_pem, "public")?.as_bytes())
            .map_err(|e| key_error(format!("public key: {e}")))?;

        let keys = Self {
            encoding,
            decoding,
            key_id: None,
        };
        keys.probe()?;
        Ok(keys)
    }

    /// PEM 파일에서 로드
    pub fn from_pem_files(
        private_path: impl AsRef<Path>,
        public_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let private_pem = read_pem(private_path.as_ref())?;
        let public_pem = read_pem(public_path.as_ref())?;
        Self::from_pem(&private_pem, &public_pem)
    }

    /// Key ID (`kid` 헤더) 설정
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Key ID
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// claims 서명
    pub fn seal<C: EnvelopeClaims>(&self, claims: &C) -> Result<String> {
        let mut header = Header::new(SIGNING_ALGORITHM);
        header.kid = self.key_id.clone();

        encode(&header, claims, &self.encoding).map_err(|e| Error::Signing {
            reason: e.to_string(),
        })
    }

    /// 서명 검증 후 claims 추출
    ///
    /// 실패 사유는 내부 로그에만 남고, 호출자에게는 `C::rejected`로 하나로 합쳐집니다.
    pub fn open<C: EnvelopeClaims>(&self, token: &str, config: &TokenConfig) -> Result<C> {
        let token = token.trim();
        if token.is_empty() {
            return Err(C::rejected("token is required".to_string()));
        }

        let data = decode::<C>(token, &self.decoding, &C::validation(config)).map_err(|e| {
            let reason = describe(e.kind());
            tracing::debug!(%reason, "signed token rejected");
            C::rejected(reason)
        })?;

        data.claims.check(config)?;
        Ok(data.claims)
    }

    fn probe(&self) -> Result<()> {
        let header = Header::new(SIGNING_ALGORITHM);
        let claims = serde_json::json!({ "probe": true });

        let token = encode(&header, &claims, &self.encoding)
            .map_err(|e| key_error(format!("private key cannot sign: {e}")))?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        decode::<serde_json::Value>(&token, &self.decoding, &validation)
            .map_err(|_| key_error("public key does not match private key"))?;
        Ok(())
    }
}

fn require_pem<'a>(pem: &'a str, which: &str) -> Result<&'a str> {
    if !pem.contains("-----BEGIN") {
        return Err(key_error(format!("no PEM block found in {which} key")));
    }
    Ok(pem)
}

fn read_pem(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| key_error(format!("read {}: {e}", path.display())))
}

fn key_error(reason: impl Into<String>) -> Error {
    Error::KeyMaterial {
        reason: reason.into(),
    }
}

/// 내부 로그용 실패 사유
fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::ExpiredSignature => "token expired".to_string(),
        ErrorKind::ImmatureSignature => "token not yet valid".to_string(),
        ErrorKind::InvalidSignature => "signature mismatch".to_string(),
        ErrorKind::InvalidAlgorithm => "algorithm not allowed".to_string(),
        ErrorKind::InvalidIssuer => "issuer mismatch".to_string(),
        ErrorKind::InvalidAudience => "audience mismatch".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing registered claim '{claim}'"),
        other => format!("malformed token: {other:?}"),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_load_key_pair() {
        let keys = TokenKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap();
        assert!(keys.key_id().is_none());

        let keys = keys.with_key_id("2026-10");
        assert_eq!(keys.key_id(), Some("2026-10"));
    }

    #[test]
    fn test_missing_pem_block() {
        let err = TokenKeys::from_pem("not a pem", PUBLIC_PEM).unwrap_err();
        match err {
            Error::KeyMaterial { reason } => assert!(reason.contains("no PEM block")),
            other => panic!("expected KeyMaterial, got {other:?}"),
        }
    }

    #[test]
    fn test_non_rsa_key_rejected() {
        let err = TokenKeys::from_pem(ED25519_PRIVATE_PEM, PUBLIC_PEM).unwrap_err();
        assert!(matches!(err, Error::KeyMaterial { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let err = TokenKeys::from_pem(PRIVATE_PEM, OTHER_PUBLIC_PEM).unwrap_err();
        match err {
            Error::KeyMaterial { reason } => assert!(reason.contains("does not match")),
            other => panic!("expected KeyMaterial, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_file() {
        let err = TokenKeys::from_pem_files("/nonexistent/private.pem", "/nonexistent/public.pem")
            .unwrap_err();
        assert!(matches!(err, Error::KeyMaterial { .. }));
    }

    #[test]
    fn test_describe_reasons() {
        assert_eq!(describe(&ErrorKind::ExpiredSignature), "token expired");
        assert_eq!(describe(&ErrorKind::InvalidSignature), "signature mismatch");
        assert_eq!(
            describe(&ErrorKind::MissingRequiredClaim("aud".to_string())),
            "missing registered claim 'aud'"
        );
    }
}
