//! Shared harness: the full router wired to in-memory adapters, plus
//! request helpers. Each test binary pulls in what it needs.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use chrono::Duration;
use tower::ServiceExt;

use api_adapters::web::{router, AppState};
use auth_adapters::jwt::JwtTokenIssuer;
use auth_adapters::password::ArgonCredentialHasher;
use domains::ports::{
    CommentRepo, CredentialHasher, MediaDelegate, ReactionRepo, TokenIssuer, UserRepo, VideoRepo,
};
use services::{AccessService, AuthService, CommentService, ReactionService, VideoService};
use storage_adapters::memory::{MemoryMediaDelegate, MemoryStore};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";
pub const BOUNDARY: &str = "videohub-test-boundary";

pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<MemoryStore>,
    pub media: Arc<MemoryMediaDelegate>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(MemoryMediaDelegate::new());

    let users: Arc<dyn UserRepo> = store.clone();
    let videos: Arc<dyn VideoRepo> = store.clone();
    let comments: Arc<dyn CommentRepo> = store.clone();
    let reactions: Arc<dyn ReactionRepo> = store.clone();
    let media_port: Arc<dyn MediaDelegate> = media.clone();

    let hasher: Arc<dyn CredentialHasher> = Arc::new(ArgonCredentialHasher::new());
    let tokens: Arc<dyn TokenIssuer> =
        Arc::new(JwtTokenIssuer::new(TEST_SECRET, Duration::hours(1)));

    let state = AppState {
        access: Arc::new(AccessService::new(users.clone(), tokens.clone())),
        auth: Arc::new(AuthService::new(users, hasher, tokens)),
        videos: Arc::new(VideoService::new(
            videos.clone(),
            comments.clone(),
            reactions.clone(),
            media_port,
        )),
        comments: Arc::new(CommentService::new(comments, videos.clone())),
        reactions: Arc::new(ReactionService::new(reactions, videos)),
    };

    TestApp {
        router: router(state),
        store,
        media,
    }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Registers through the API and returns (token, user json).
pub async fn register(
    app: &TestApp,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> (String, serde_json::Value) {
    let mut body = serde_json::json!({ "email": email, "password": password });
    if let Some(role) = role {
        body["role"] = serde_json::json!(role);
    }
    let (status, body) = send(
        app,
        json_request(Method::POST, "/api/auth/register", None, &body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"].clone(),
    )
}

pub fn multipart_request(
    token: &str,
    title: &str,
    description: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in [("title", title), ("description", description)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; \
             filename=\"clip\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/videos")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Uploads a small mp4 and returns the video json.
pub async fn upload_video(app: &TestApp, token: &str, title: &str) -> serde_json::Value {
    let (status, body) = send(
        app,
        multipart_request(token, title, "a clip", "video/mp4", b"mp4-bytes"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
    body["video"].clone()
}
