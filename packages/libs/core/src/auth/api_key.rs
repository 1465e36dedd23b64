//! Organization API Key
//!
//! 서비스 간 호출용 불투명(opaque) API Key입니다.
//! 평문은 생성 시 1회만 노출되고, 저장소에는 SHA-256 digest만 남습니다.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::crypto::{constant_time_eq, random_urlsafe};
use crate::error::Result;

/// 로그/UI에서 바로 알아볼 수 있도록 붙는 접두사
pub const API_KEY_PREFIX: &str = "cl_";

/// 난수 바이트 수
const API_KEY_ENTROPY_BYTES: usize = 32;

/// API Key 전체 (평문 + digest)
///
/// 생성 시에만 사용되며, 이후 평문은 조회할 수 없습니다.
#[derive(Clone)]
pub struct ApiKeySecret {
    /// 평문 (`cl_...`, 생성 시 1회만 노출)
    pub plaintext: String,

    /// 저장/조회용 digest (hex)
    pub digest: String,
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeySecret")
            .field("plaintext", &"<redacted>")
            .field("digest", &self.digest)
            .finish()
    }
}

/// 새 API Key 생성
pub fn generate_api_key() -> Result<ApiKeySecret> {
    let plaintext = format!("{}{}", API_KEY_PREFIX, random_urlsafe(API_KEY_ENTROPY_BYTES)?);
    let digest = digest_api_key(&plaintext);
    Ok(ApiKeySecret { plaintext, digest })
}

/// 평문 API Key의 digest (SHA-256, hex)
///
/// 검증 시 저장소 조회 키로 그대로 사용합니다.
pub fn digest_api_key(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// 평문이 저장된 digest와 일치하는지 constant-time으로 비교
pub fn api_key_matches(plaintext: &str, stored_digest: &str) -> bool {
    let candidate = digest_api_key(plaintext);
    constant_time_eq(candidate.as_bytes(), stored_digest.as_bytes())
}

/// Clove API Key 형식인지 확인 (접두사만 검사)
pub fn has_api_key_prefix(value: &str) -> bool {
    value.starts_with(API_KEY_PREFIX) && value.len() > API_KEY_PREFIX.len()
}
