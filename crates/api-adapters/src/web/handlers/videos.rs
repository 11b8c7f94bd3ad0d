//! Video upload, listing, detail, deletion, and moderation.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use domains::error::DomainError;
use domains::models::PageRequest;
use mime::Mime;
use serde::Deserialize;
use serde_json::json;
use services::videos::{ListQuery, UploadInput};
use uuid::Uuid;

use crate::web::error::ApiResult;
use crate::web::{bearer_token, AppState};

const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListParams {
    page: Option<u32>,
    limit: Option<u32>,
    author_id: Option<Uuid>,
    is_blocked: Option<bool>,
    search: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<VideoListParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.resolve_actor(bearer_token(&headers)).await?;
    let page = PageRequest::new(
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    let query = ListQuery {
        author_id: params.author_id,
        blocked: params.is_blocked,
        search: params.search,
    };
    let (videos, pagination) = state.videos.list(&actor, query, page).await?;
    Ok(Json(json!({ "videos": videos, "pagination": pagination })))
}

pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;

    let mut title: Option<String> = None;
    let mut description = String::new();
    let mut file: Option<(Bytes, Mime)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("description") => {
                description = field.text().await.map_err(multipart_error)?;
            }
            Some("video") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .parse::<Mime>()
                    .map_err(|_| DomainError::Validation("unrecognized content type".into()))?;
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((data, content_type));
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| DomainError::Validation("video title is required".into()))?;
    let (data, content_type) =
        file.ok_or_else(|| DomainError::Validation("video file is required".into()))?;

    let video = state
        .videos
        .upload(
            &actor,
            UploadInput {
                title,
                description,
                content_type,
                data,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "video uploaded successfully", "video": video })),
    ))
}

pub async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.resolve_actor(bearer_token(&headers)).await?;
    let detail = state.videos.get(&actor, id).await?;

    let mut video = serde_json::to_value(&detail.card)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    video["comments"] = json!(detail.comments);
    video["stats"] = json!(detail.stats);
    Ok(Json(json!({ "video": video })))
}

pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    state.videos.delete(&actor, id).await?;
    Ok(Json(json!({ "message": "video deleted successfully" })))
}

pub async fn toggle_block(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    let video = state.videos.toggle_block(&actor, id).await?;
    let message = if video.video.is_blocked {
        "video blocked"
    } else {
        "video unblocked"
    };
    Ok(Json(json!({ "message": message, "video": video })))
}

/// A body that outgrows the router's limit surfaces as a stream error while
/// reading a field; report it with the same message as the in-range size
/// check rather than a bare 413.
fn multipart_error(err: axum::extract::multipart::MultipartError) -> DomainError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::Validation("file size must not exceed 100MB".into())
    } else {
        DomainError::Validation(format!("invalid multipart field: {err}"))
    }
}
