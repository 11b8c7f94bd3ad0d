//! Request handlers, one module per resource.

pub mod auth;
pub mod comments;
pub mod likes;
pub mod videos;

use axum::Json;
use chrono::Utc;
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "VideoHub API is running",
        "timestamp": Utc::now(),
    }))
}
