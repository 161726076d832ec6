use axum::response::{IntoResponse, Json};
use serde_json::json;

/// 健康检查处理器
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
