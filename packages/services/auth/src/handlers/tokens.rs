//! 신원 토큰 핸들러

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clove_core::auth::IssuedToken;

use crate::error::Result;
use crate::middleware::bearer_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// 로그인 성공 후 호출: 신원 토큰 발급
pub async fn mint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MintRequest>,
) -> Result<Json<IssuedToken>> {
    let issued = state.tokens.mint(&request.user_id, &request.email)?;
    Ok(Json(issued))
}

/// Bearer 토큰 검증
pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<IdentityResponse>> {
    let token = bearer_token(&headers)?;
    let claims = state.tokens.validate(token)?;

    Ok(Json(IdentityResponse {
        user_id: claims.user_id,
        email: claims.email,
        expires_at: claims.exp,
    }))
}
