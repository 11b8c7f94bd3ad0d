//! Comment creation, listing, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use domains::error::DomainError;
use domains::models::PageRequest;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::web::error::ApiResult;
use crate::web::{bearer_token, AppState};

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    text: Option<String>,
    video_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CommentListParams {
    page: Option<u32>,
    limit: Option<u32>,
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CommentBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    let (text, video_id) = match (body.text, body.video_id) {
        (Some(text), Some(video_id)) => (text, video_id),
        _ => {
            return Err(DomainError::Validation(
                "comment text and video id are required".into(),
            )
            .into())
        }
    };
    let comment = state.comments.create(&actor, &text, video_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "comment added", "comment": comment })),
    ))
}

/// Public: comment threads are readable without a credential.
pub async fn list_by_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    Query(params): Query<CommentListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    let (comments, pagination) = state.comments.list_by_video(video_id, page).await?;
    Ok(Json(json!({ "comments": comments, "pagination": pagination })))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    state.comments.delete(&actor, id).await?;
    Ok(Json(json!({ "message": "comment deleted" })))
}
