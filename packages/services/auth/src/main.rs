//! Clove Auth 서버

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clove_auth::config::Config;
use clove_auth::{create_internal_router, create_router};
use clove_auth::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clove_auth=debug,clove_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Auth with config: {:?}", config);

    // 키 로드 실패 시 기동 중단
    let state = Arc::new(AppState::new(&config)?);

    let public_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let internal_addr = SocketAddr::new(config.internal_host, config.internal_port);

    let public_listener = TcpListener::bind(public_addr).await?;
    let internal_listener = TcpListener::bind(internal_addr).await?;
    tracing::info!("Auth listening on {} (internal {})", public_addr, internal_addr);

    tokio::try_join!(
        axum::serve(public_listener, create_router(state.clone())).into_future(),
        axum::serve(internal_listener, create_internal_router(state)).into_future(),
    )?;

    Ok(())
}
