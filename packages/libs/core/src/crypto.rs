//! 보안 난수와 constant-time 비교
//!
//! 모든 비밀 값(salt, API Key, 세션 시크릿)은 OS RNG에서 가져옵니다.
//! `OsRng`는 잠금 없이 동시에 사용할 수 있습니다.

use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// `len` 바이트의 보안 난수 생성
///
/// RNG 실패는 재시도하지 않고 그대로 에러로 올립니다.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| Error::Entropy {
        reason: e.to_string(),
    })?;
    Ok(bytes)
}

/// `len` 바이트 난수를 URL-safe base64(패딩 포함)로 인코딩
pub fn random_urlsafe(len: usize) -> Result<String> {
    let bytes = random_bytes(len)?;
    Ok(general_purpose::URL_SAFE.encode(bytes))
}

/// constant-time 바이트 비교
///
/// 길이가 다르면 즉시 false.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        assert_eq!(random_bytes(16).unwrap().len(), 16);
        assert!(random_bytes(0).unwrap().is_empty());
    }

    #[test]
    fn test_random_urlsafe_alphabet() {
        let value = random_urlsafe(32).unwrap();
        // 32 bytes → 44 chars (패딩 1개)
        assert_eq!(value.len(), 44);
        assert!(!value.contains('+'));
        assert!(!value.contains('/'));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
