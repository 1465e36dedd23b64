//! API Key 핸들러
//!
//! 평문 키는 발급 응답에서 한 번만 노출됩니다. 저장은 호출자가 digest로 합니다.

use axum::Json;
use serde::{Deserialize, Serialize};

use clove_core::auth::{digest_api_key, generate_api_key};

use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct CreateApiKeyResponse {
    pub key: String,
    pub key_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct DigestRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub key_hash: String,
}

pub async fn create() -> Result<Json<CreateApiKeyResponse>> {
    let secret = generate_api_key()?;
    tracing::info!("api key generated");

    Ok(Json(CreateApiKeyResponse {
        key: secret.plaintext,
        key_hash: secret.digest,
    }))
}

/// 제시된 키의 digest 계산 (호출자가 저장된 digest와 조회)
pub async fn digest(Json(request): Json<DigestRequest>) -> Json<DigestResponse> {
    Json(DigestResponse {
        key_hash: digest_api_key(&request.key),
    })
}
