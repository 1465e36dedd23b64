//! 공통 에러 타입
//!
//! 엔진 전체에서 사용되는 에러 타입을 정의합니다.
//! 내부 로그에는 상세 사유를 남기되, 외부 응답은 `public_message()`로 축약합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Clove 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Password Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("malformed password hash: {reason}")]
    MalformedHash { reason: String },

    #[error("invalid hash parameters: {reason}")]
    InvalidHashParams { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Key Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid key material: {reason}")]
    KeyMaterial { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Policy Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid scope request: {reason}")]
    InvalidScope { reason: String },

    #[error("policy parse error: {message}")]
    PolicyParse { message: String },

    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Auth Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("invalid credential: {reason}")]
    InvalidCredential { reason: String },

    #[error("missing required claims: {claims}")]
    MissingClaims { claims: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("entropy source failure: {reason}")]
    Entropy { reason: String },

    #[error("token signing failed: {reason}")]
    Signing { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::MalformedHash { .. }
            | Error::KeyMaterial { .. }
            | Error::InvalidScope { .. }
            | Error::PolicyParse { .. }
            | Error::MissingField { .. }
            | Error::Json(_) => 400,

            // 401 Unauthorized
            Error::InvalidToken { .. }
            | Error::InvalidCredential { .. }
            | Error::MissingClaims { .. } => 401,

            // 403 Forbidden
            Error::AccessDenied { .. } => 403,

            // 500 Internal Server Error
            Error::InvalidHashParams { .. } | Error::Entropy { .. } | Error::Signing { .. } => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    ///
    /// 토큰/자격증명 실패는 어떤 검사가 실패했는지 드러내지 않도록 하나로 합칩니다.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedHash { .. } => "MALFORMED_HASH",
            Error::KeyMaterial { .. } => "INVALID_KEY_MATERIAL",
            Error::InvalidScope { .. } => "INVALID_SCOPE",
            Error::PolicyParse { .. } => "POLICY_PARSE_ERROR",
            Error::MissingField { .. } => "MISSING_FIELD",
            Error::Json(_) => "JSON_ERROR",
            Error::InvalidToken { .. }
            | Error::InvalidCredential { .. }
            | Error::MissingClaims { .. } => "UNAUTHORIZED",
            Error::AccessDenied { .. } => "ACCESS_DENIED",
            Error::InvalidHashParams { .. } | Error::Entropy { .. } | Error::Signing { .. } => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// 외부 응답용 메시지
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            400 => "bad request",
            401 => "unauthorized",
            403 => "forbidden",
            _ => "internal error",
        }
    }
}
