//! Auth 미들웨어
//!
//! 요청 ID 부여와 신원 토큰 검증을 담당합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::state::AppState;

/// 검증된 신원 (요청 extension)
#[derive(Clone, Debug)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출
///
/// 헤더가 없으면 401, 공백 기준으로 정확히 두 부분이 아니면 400입니다.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::Unauthorized {
            message: "missing Authorization header".to_string(),
        })?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(*token)
        }
        _ => Err(AuthError::BadRequest {
            message: "invalid Authorization header".to_string(),
        }),
    }
}

/// 신원 토큰 필수 레이어
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(req.headers())?;
    let claims = state.tokens.validate(token)?;

    tracing::debug!(user_id = %claims.user_id, "identity verified");
    req.extensions_mut().insert(Identity {
        user_id: claims.user_id,
        email: claims.email,
        expires_at: claims.exp,
    });

    Ok(next.run(req).await)
}
