mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{bare_request, json_request, register, send, test_app, upload_video};

#[tokio::test]
async fn comment_create_and_list() {
    let app = test_app();
    let (token, user) = register(&app, "alice@example.com", "hunter22", None).await;
    let video = upload_video(&app, &token, "My clip").await;
    let video_id = video["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            Some(&token),
            &json!({ "text": "  nice one  ", "videoId": video_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "comment added");
    assert_eq!(body["comment"]["text"], "nice one");

    // listing is public
    let (status, body) = send(
        &app,
        bare_request(Method::GET, &format!("/api/comments/video/{video_id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["author"]["email"], user["email"]);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn comment_requires_authentication() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            None,
            &json!({ "text": "hi", "videoId": uuid::Uuid::new_v4() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn comment_validates_body() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com", "hunter22", None).await;
    let video = upload_video(&app, &token, "My clip").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            Some(&token),
            &json!({ "videoId": video["id"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "comment text and video id are required");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            Some(&token),
            &json!({ "text": "   ", "videoId": video["id"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_on_missing_video_is_404() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com", "hunter22", None).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            Some(&token),
            &json!({ "text": "hi", "videoId": uuid::Uuid::new_v4() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "video not found");
}

#[tokio::test]
async fn comment_on_blocked_video_is_forbidden() {
    let app = test_app();
    let (token, _) = register(&app, "alice@example.com", "hunter22", None).await;
    let (admin, _) = register(&app, "root@example.com", "hunter22", Some("ADMIN")).await;
    let video = upload_video(&app, &token, "My clip").await;
    let id = video["id"].as_str().unwrap();

    send(
        &app,
        bare_request(Method::PATCH, &format!("/api/videos/{id}/block"), Some(&admin)),
    )
    .await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/comments",
            Some(&token),
            &json!({ "text": "hi", "videoId": id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn comment_delete_is_author_or_admin() {
    let app = test_app();
    let (author, _) = register(&app, "alice@example.com", "hunter22", None).await;
    let (other, _) = register(&app, "bob@example.com", "hunter22", None).await;
    let (admin, _) = register(&app, "root@example.com", "hunter22", Some("ADMIN")).await;
    let video = upload_video(&app, &author, "My clip").await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let (_, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/comments",
                Some(&author),
                &json!({ "text": "hi", "videoId": video["id"] }),
            ),
        )
        .await;
        ids.push(body["comment"]["id"].as_str().unwrap().to_string());
    }

    let (status, _) = send(
        &app,
        bare_request(Method::DELETE, &format!("/api/comments/{}", ids[0]), Some(&other)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        bare_request(Method::DELETE, &format!("/api/comments/{}", ids[0]), Some(&author)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "comment deleted");

    let (status, _) = send(
        &app,
        bare_request(Method::DELETE, &format!("/api/comments/{}", ids[1]), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        bare_request(Method::DELETE, &format!("/api/comments/{}", ids[1]), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
