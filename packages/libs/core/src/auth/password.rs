//! 비밀번호 해싱 (Argon2id)
//!
//! 해시는 PHC 형식과 유사한 단일 문자열로 저장됩니다:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=2$<base64 salt>$<base64 digest>
//! ```
//!
//! salt/digest는 패딩 없는 표준 base64입니다.

use std::fmt;
use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::crypto::{constant_time_eq, random_bytes};
use crate::error::{Error, Result};

/// 알고리즘 태그
pub const ALGORITHM: &str = "argon2id";

/// Argon2 버전 (0x13)
pub const VERSION: u32 = 19;

/// 허용 최대 메모리 비용 (1 GiB)
pub const MAX_MEMORY_COST_KIB: u32 = 1024 * 1024;

/// 허용 최대 반복 횟수
pub const MAX_ITERATIONS: u32 = 16;

/// 허용 최대 병렬도
pub const MAX_PARALLELISM: u32 = 16;

/// Argon2 최소 메모리: 병렬 lane당 8 KiB
const MIN_MEMORY_PER_LANE_KIB: u32 = 8;

/// Argon2id 비용 파라미터
///
/// 프로세스 시작 시 한 번 정해지고 이후 변경되지 않습니다.
/// 기본값은 `HashParams::DEFAULT`이며 테스트/튜닝 시에만 다른 값을 넘깁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// 메모리 비용 (KiB)
    pub memory_cost_kib: u32,

    /// 반복 횟수 (time cost)
    pub iterations: u32,

    /// 병렬도
    pub parallelism: u32,

    /// salt 길이 (bytes)
    pub salt_length: usize,

    /// digest 길이 (bytes)
    pub key_length: usize,
}

impl HashParams {
    /// 64 MiB, 3회, 병렬도 2, 16바이트 salt, 32바이트 digest
    pub const DEFAULT: HashParams = HashParams {
        memory_cost_kib: 64 * 1024,
        iterations: 3,
        parallelism: 2,
        salt_length: 16,
        key_length: 32,
    };

    /// 모든 필드가 0보다 큰지 확인
    pub fn validate(&self) -> Result<()> {
        let zero = [
            ("memory_cost_kib", self.memory_cost_kib == 0),
            ("iterations", self.iterations == 0),
            ("parallelism", self.parallelism == 0),
            ("salt_length", self.salt_length == 0),
            ("key_length", self.key_length == 0),
        ];

        if let Some((name, _)) = zero.iter().find(|(_, is_zero)| *is_zero) {
            return Err(Error::InvalidHashParams {
                reason: format!("{name} must be greater than zero"),
            });
        }

        check_cost(self.memory_cost_kib, self.iterations, self.parallelism)
            .map_err(|reason| Error::InvalidHashParams { reason })
    }
}

impl Default for HashParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 인코딩된 비밀번호 해시
///
/// 파싱 후 다시 인코딩하면 원래 문자열과 동일합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl EncodedHash {
    /// 문자열에서 파싱
    ///
    /// 세그먼트 수, 알고리즘, 버전, `m=,t=,p=` 순서, base64 중 하나라도 어긋나면 에러입니다.
    pub fn parse(encoded: &str) -> Result<Self> {
        let parts: Vec<&str> = encoded.split('$').collect();
        if parts.len() != 6 || !parts[0].is_empty() {
            return Err(malformed(format!(
                "expected 6 '$'-delimited segments, got {}",
                parts.len()
            )));
        }

        if parts[1] != ALGORITHM {
            return Err(malformed(format!("unsupported algorithm '{}'", parts[1])));
        }

        let version = parse_field(parts[2], "v=")?;
        if version != VERSION {
            return Err(malformed(format!("unsupported version {version}")));
        }

        let params: Vec<&str> = parts[3].split(',').collect();
        if params.len() != 3 {
            return Err(malformed("parameter block must be m=<n>,t=<n>,p=<n>"));
        }
        let memory_cost_kib = parse_field(params[0], "m=")?;
        let iterations = parse_field(params[1], "t=")?;
        let parallelism = parse_field(params[2], "p=")?;
        check_cost(memory_cost_kib, iterations, parallelism).map_err(malformed)?;

        let salt = general_purpose::STANDARD_NO_PAD
            .decode(parts[4])
            .map_err(|e| malformed(format!("salt: {e}")))?;
        let digest = general_purpose::STANDARD_NO_PAD
            .decode(parts[5])
            .map_err(|e| malformed(format!("digest: {e}")))?;

        Ok(Self {
            memory_cost_kib,
            iterations,
            parallelism,
            salt,
            digest,
        })
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM,
            VERSION,
            self.memory_cost_kib,
            self.iterations,
            self.parallelism,
            general_purpose::STANDARD_NO_PAD.encode(&self.salt),
            general_purpose::STANDARD_NO_PAD.encode(&self.digest),
        )
    }
}

impl FromStr for EncodedHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 비밀번호 해싱
///
/// 매 호출마다 새 salt를 생성하므로 같은 비밀번호도 다른 문자열이 나옵니다.
pub fn hash_password(password: &str, params: &HashParams) -> Result<String> {
    params.validate()?;

    let salt = random_bytes(params.salt_length)?;
    let digest = derive(
        password,
        &salt,
        params.memory_cost_kib,
        params.iterations,
        params.parallelism,
        params.key_length,
    )
    .map_err(|e| Error::InvalidHashParams {
        reason: e.to_string(),
    })?;

    let encoded = EncodedHash {
        memory_cost_kib: params.memory_cost_kib,
        iterations: params.iterations,
        parallelism: params.parallelism,
        salt,
        digest,
    };
    Ok(encoded.to_string())
}

/// 비밀번호 검증
///
/// 비밀번호가 틀리면 `Ok(false)`, 해시 문자열 자체가 잘못되었으면 `Err`입니다.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool> {
    let stored = EncodedHash::parse(encoded)?;

    let candidate = derive(
        password,
        &stored.salt,
        stored.memory_cost_kib,
        stored.iterations,
        stored.parallelism,
        stored.digest.len(),
    )
    .map_err(|e| malformed(e.to_string()))?;

    Ok(constant_time_eq(&candidate, &stored.digest))
}

fn derive(
    password: &str,
    salt: &[u8],
    memory_cost_kib: u32,
    iterations: u32,
    parallelism: u32,
    key_length: usize,
) -> std::result::Result<Vec<u8>, argon2::Error> {
    let params = Params::new(memory_cost_kib, iterations, parallelism, Some(key_length))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut digest = vec![0u8; key_length];
    argon2.hash_password_into(password.as_bytes(), salt, &mut digest)?;
    Ok(digest)
}

/// 비용 상한/하한 검사
///
/// 저장된 해시 문자열의 파라미터가 그대로 할당 크기가 되므로 파싱 단계에서 막습니다.
fn check_cost(
    memory_cost_kib: u32,
    iterations: u32,
    parallelism: u32,
) -> std::result::Result<(), String> {
    if iterations == 0 || iterations > MAX_ITERATIONS {
        return Err(format!("t={iterations} outside 1..={MAX_ITERATIONS}"));
    }
    if parallelism == 0 || parallelism > MAX_PARALLELISM {
        return Err(format!("p={parallelism} outside 1..={MAX_PARALLELISM}"));
    }
    if memory_cost_kib > MAX_MEMORY_COST_KIB {
        return Err(format!("m={memory_cost_kib} exceeds {MAX_MEMORY_COST_KIB}"));
    }
    if memory_cost_kib < MIN_MEMORY_PER_LANE_KIB * parallelism {
        return Err(format!(
            "m={memory_cost_kib} below {MIN_MEMORY_PER_LANE_KIB} KiB per lane (p={parallelism})"
        ));
    }
    Ok(())
}

/// `<prefix><n>` 파싱
///
/// 부호나 앞자리 0이 붙은 값은 다시 인코딩했을 때 원문과 달라지므로 거부합니다.
fn parse_field(segment: &str, prefix: &str) -> Result<u32> {
    let value = segment
        .strip_prefix(prefix)
        .ok_or_else(|| malformed(format!("expected '{prefix}<n>', got '{segment}'")))?;

    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));
    if !canonical {
        return Err(malformed(format!(
            "'{segment}' is not a canonical unsigned integer"
        )));
    }

    value
        .parse()
        .map_err(|_| malformed(format!("'{segment}' is out of range")))
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedHash {
        reason: reason.into(),
    }
}
