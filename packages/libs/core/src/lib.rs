//! clove-core: Clove 인증/인가 엔진
//!
//! Auth 서비스와 리소스 서버(스토리지 API)가 공유하는 핵심 타입과 로직을 제공합니다.
//! 모든 연산은 상태가 없으며 I/O 없이 동작합니다 (시작 시 키 로드 제외).
//!
//! # 모듈 구조
//!
//! - `auth`: 비밀번호 해싱, API Key, 서명 토큰, 세션 자격증명
//! - `permissions`: IAM 정책 생성 및 평가
//! - `crypto`: 보안 난수와 constant-time 비교
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod crypto;
pub mod error;
pub mod permissions;

pub use error::{Error, Result};
