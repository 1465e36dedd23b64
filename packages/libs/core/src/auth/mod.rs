//! 인증 관련 타입 및 로직
//!
//! # 개요
//!
//! Clove의 인증 엔진은 상태가 없습니다. 저장소는 호출자가 관리하고,
//! 이 모듈은 해시/키/토큰의 생성과 검증만 담당합니다.
//!
//! # 자격증명 종류
//!
//! - **Password Hash**: Argon2id, 인코딩된 문자열에 파라미터 포함
//! - **API Key**: `cl_` 접두사 opaque 키, 저장은 SHA-256 digest로만
//! - **Identity Token**: RS256 JWT (15분)
//! - **Session Credential**: 스코프 정책을 품은 RS256 JWT + access/secret key (12시간)

mod api_key;
mod claims;
mod envelope;
mod password;
mod session;
mod token;

pub use api_key::{
    api_key_matches, digest_api_key, generate_api_key, has_api_key_prefix, ApiKeySecret,
    API_KEY_PREFIX,
};
pub use claims::{IdentityClaims, SessionClaims};
pub use envelope::{EnvelopeClaims, TokenKeys, SIGNING_ALGORITHM};
pub use password::{hash_password, verify_password, EncodedHash, HashParams};
pub use session::{
    session_ttl, CredentialIssuer, SessionCredential, SessionGrant, ACCESS_KEY_PREFIX,
};
pub use token::{IssuedToken, TokenConfig, TokenService, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
