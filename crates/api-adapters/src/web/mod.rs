//! Axum wiring: shared state, routes, and the standard middleware stack.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use services::{AccessService, AuthService, CommentService, ReactionService, VideoService};

/// State shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub access: Arc<AccessService>,
    pub auth: Arc<AuthService>,
    pub videos: Arc<VideoService>,
    pub comments: Arc<CommentService>,
    pub reactions: Arc<ReactionService>,
}

/// Pulls the bearer token out of the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Builds the full API router. Mounted under `/api` to match the wire
/// contract the clients persist sessions against.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/videos",
            get(handlers::videos::list).post(handlers::videos::upload),
        )
        .route(
            "/api/videos/{id}",
            get(handlers::videos::get_one).delete(handlers::videos::remove),
        )
        .route("/api/videos/{id}/block", patch(handlers::videos::toggle_block))
        .route("/api/comments", post(handlers::comments::create))
        .route(
            "/api/comments/video/{video_id}",
            get(handlers::comments::list_by_video),
        )
        .route("/api/comments/{id}", delete(handlers::comments::remove))
        .route("/api/likes", post(handlers::likes::toggle))
        .route("/api/likes/{video_id}", get(handlers::likes::stats))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // a little above the media ceiling: files within it reach the
        // service's precise size check, anything beyond trips the limit and
        // is mapped to the same 400 in the upload handler
        .layer(DefaultBodyLimit::max(services::videos::MAX_VIDEO_BYTES + 16 * 1024))
        .with_state(state)
}

async fn route_not_found() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({ "error": "route not found" })),
    )
}
