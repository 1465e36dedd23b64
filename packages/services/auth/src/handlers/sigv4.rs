//! 세션 자격증명 핸들러
//!
//! 발급(`/v1/sigv4`)은 신원 토큰이 필요하고, 검증/인가는 리소스 서버가
//! 내부적으로 호출합니다.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use clove_core::auth::SessionCredential;
use clove_core::permissions::arn::{bucket_arn, object_arn, ALL_RESOURCES};
use clove_core::permissions::{PolicyDocument, PolicyEvaluator, ScopeRequest};

use crate::error::Result;
use crate::middleware::Identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub org_id: String,
    pub policy: PolicyDocument,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub session_token: String,
    pub action: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub allowed: bool,
    pub org_id: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<ScopeRequest>,
) -> Result<Json<SessionCredential>> {
    tracing::debug!(
        user_id = %identity.user_id,
        org_id = %request.org_id,
        "session credential requested"
    );

    let credential = state.credentials.issue(&request)?;
    Ok(Json(credential))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let grant = state.credentials.validate(&request.session_token)?;

    Ok(Json(VerifyResponse {
        org_id: grant.org_id,
        policy: grant.policy,
    }))
}

/// 세션 토큰의 정책으로 단일 요청 인가
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>> {
    let grant = state.credentials.validate(&request.session_token)?;
    let resource = resource_for(
        state.credentials.builder().namespace(),
        request.bucket.as_deref(),
        request.key.as_deref(),
    );

    let result = PolicyEvaluator::new(&grant.policy).evaluate(&request.action, &resource);
    if !result.allowed {
        tracing::info!(
            org_id = %grant.org_id,
            action = %request.action,
            %resource,
            reason = ?result.reason,
            "access denied"
        );
    }

    Ok(Json(AuthorizeResponse {
        allowed: result.allowed,
        org_id: grant.org_id,
    }))
}

fn resource_for(namespace: &str, bucket: Option<&str>, key: Option<&str>) -> String {
    let bucket = bucket.map(str::trim).filter(|b| !b.is_empty());
    let key = key.map(str::trim).filter(|k| !k.is_empty());

    match (bucket, key) {
        (Some(bucket), Some(key)) => object_arn(namespace, bucket, key),
        (Some(bucket), None) => bucket_arn(namespace, bucket),
        (None, _) => ALL_RESOURCES.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_for() {
        assert_eq!(resource_for("clove", None, None), "*");
        assert_eq!(resource_for("clove", None, Some("a.txt")), "*");
        assert_eq!(resource_for("clove", Some("b1"), None), "arn:clove:s3:::b1");
        assert_eq!(resource_for("clove", Some("b1"), Some(" ")), "arn:clove:s3:::b1");
        assert_eq!(
            resource_for("clove", Some("b1"), Some("docs/a.txt")),
            "arn:clove:s3:::b1/docs/a.txt"
        );
    }
}
