//! Registration, login, and the current-user profile.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use domains::error::DomainError;
use domains::models::Role;
use serde::Deserialize;
use serde_json::json;
use services::access::{require_tier, RoleTier};
use services::auth::RegisterInput;

use crate::web::error::ApiResult;
use crate::web::{bearer_token, AppState};

// Fields are optional so missing ones surface as the contractual 400, not a
// deserialization rejection.
#[derive(Deserialize)]
pub struct RegisterBody {
    email: Option<String>,
    password: Option<String>,
    role: Option<Role>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let (email, password) = require_credentials(body.email, body.password)?;
    let outcome = state
        .auth
        .register(RegisterInput {
            email,
            password,
            role: body.role,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "registration successful",
            "token": outcome.token,
            "user": outcome.user,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let (email, password) = require_credentials(body.email, body.password)?;
    let outcome = state.auth.login(&email, &password).await?;
    Ok(Json(json!({
        "message": "login successful",
        "token": outcome.token,
        "user": outcome.user,
    })))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<serde_json::Value>> {
    let actor = state.access.require_actor(bearer_token(&headers)).await?;
    let user = require_tier(&actor, RoleTier::Authenticated)?;
    let (user, counts) = state.auth.me(user.id).await?;

    let mut body = serde_json::to_value(&user)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    body["counts"] = json!(counts);
    Ok(Json(json!({ "user": body })))
}

fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), DomainError> {
    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(DomainError::Validation(
            "email and password are required".into(),
        )),
    }
}
