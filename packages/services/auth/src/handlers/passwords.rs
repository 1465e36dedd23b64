//! 비밀번호 해싱 핸들러
//!
//! Argon2 연산은 CPU를 오래 점유하므로 blocking 풀에서 실행합니다.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use clove_core::auth::{hash_password, verify_password};

use crate::error::{AuthError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HashRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct HashResponse {
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub password: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

pub async fn hash(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HashRequest>,
) -> Result<Json<HashResponse>> {
    let params = state.hash_params;
    let password_hash = blocking(move || hash_password(&request.password, &params)).await??;

    Ok(Json(HashResponse { password_hash }))
}

/// 불일치는 에러가 아니라 `valid: false`
pub async fn verify(Json(request): Json<VerifyRequest>) -> Result<Json<VerifyResponse>> {
    let valid =
        blocking(move || verify_password(&request.password, &request.password_hash)).await??;

    if !valid {
        tracing::debug!("password mismatch");
    }
    Ok(Json(VerifyResponse { valid }))
}

async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal {
            message: format!("hashing task failed: {e}"),
        })
}
