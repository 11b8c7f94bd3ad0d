//! Reaction toggling and per-video stats.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use domains::error::DomainError;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::web::error::ApiResult;
use crate::web::{bearer_token, AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBody {
    video_id: Option<Uuid>,
    is_like: Option<bool>,
}

pub async fn toggle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ToggleBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    let (video_id, is_like) = match (body.video_id, body.is_like) {
        (Some(video_id), Some(is_like)) => (video_id, is_like),
        _ => {
            return Err(DomainError::Validation(
                "video id and reaction type are required".into(),
            )
            .into())
        }
    };
    let outcome = state.reactions.toggle(&actor, video_id, is_like).await?;
    Ok(Json(json!({
        "message": outcome.message,
        "like": outcome.reaction,
        "stats": outcome.stats,
    })))
}

/// Auth optional: anonymous callers get the aggregate counts, identified
/// callers additionally get their own reaction.
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(video_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.resolve_actor(bearer_token(&headers)).await?;
    let (stats, user_like) = state.reactions.stats(&actor, video_id).await?;
    Ok(Json(json!({ "stats": stats, "userLike": user_like })))
}
