//! Maps the domain error taxonomy onto the HTTP error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::error::DomainError;
use serde_json::json;

pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            DomainError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            DomainError::Unauthenticated(m) => (StatusCode::UNAUTHORIZED, m),
            DomainError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            DomainError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            // the register contract pins duplicate-email to 400
            DomainError::Conflict(m) => (StatusCode::BAD_REQUEST, m),
            DomainError::Upstream(m) => {
                tracing::error!(error = %m, "upstream dependency failed");
                (StatusCode::BAD_GATEWAY, m)
            }
            DomainError::Internal(m) => {
                tracing::error!(error = %m, "unhandled internal error");
                let body = if cfg!(debug_assertions) {
                    json!({ "error": "internal server error", "detail": m })
                } else {
                    json!({ "error": "internal server error" })
                };
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
