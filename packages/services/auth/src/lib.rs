//! Clove Auth 서비스
//!
//! clove-core 엔진을 JSON 엔드포인트로 노출합니다. 사용자/조직/키 저장은
//! 다른 서비스가 담당하고, 여기서는 계산만 합니다.
//!
//! 라우터는 둘로 나뉩니다:
//!
//! - **공개 라우터**: 신원 토큰을 가진 클라이언트용 (`/v1/*`)
//! - **내부 라우터**: 형제 서비스 전용 (`/internal/*`), 별도 리스너에서만 서빙

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use state::AppState;

/// 공개 라우터 생성
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 신원 토큰 필요
        .route("/v1/sigv4", post(handlers::sigv4::create))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_identity))
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}

/// 내부 라우터 생성
///
/// 토큰 발급/검증, 해싱, 세션 인가를 제공합니다. 공개 포트에 붙이면 안 됩니다.
pub fn create_internal_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/internal/passwords/hash", post(handlers::passwords::hash))
        .route("/internal/passwords/verify", post(handlers::passwords::verify))
        .route("/internal/tokens", post(handlers::tokens::mint))
        .route("/internal/tokens/verify", post(handlers::tokens::verify))
        .route("/internal/apikeys", post(handlers::apikeys::create))
        .route("/internal/apikeys/digest", post(handlers::apikeys::digest))
        .route("/internal/sigv4/verify", post(handlers::sigv4::verify))
        .route("/internal/sigv4/authorize", post(handlers::sigv4::authorize))
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}
