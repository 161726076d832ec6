//! HTTP Server - 路由与启动

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat_handler, health_handler};
use crate::state::AppState;

/// 创建路由
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // 健康检查
        .route("/health", get(health_handler))
        // 聊天
        .route("/api/chat", post(chat_handler))
        // 中间件
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 运行 HTTP 服务器
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Harry server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
