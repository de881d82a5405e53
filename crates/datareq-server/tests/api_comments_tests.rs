//! Integration tests for comment and vote API endpoints

use axum::http::StatusCode;
use serde_json::json;

mod helpers;
use helpers::{setup_test_app, As, ADMIN, OTHER, OWNER};

#[tokio::test]
async fn test_comment_thread_lifecycle() {
    let app = setup_test_app();
    let id = app.create_request(As::User(OWNER), "Discussed").await;
    let thread = format!("/api/v1/datarequests/{}/comments", id);

    let (status, first) = app
        .post(&thread, As::User(OTHER), json!({ "comment": "<b>+1</b>" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["data"]["comment"], "&lt;b&gt;+1&lt;/b&gt;");
    assert_eq!(first["data"]["user"]["name"], "bob");

    let (status, _) = app
        .post(&thread, As::User(OWNER), json!({ "comment": "Thanks" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = app.get(&thread, As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    let comments = list["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1]["comment"], "Thanks");

    let (_, desc) = app.get(&format!("{}?sort=desc", thread), As::Anonymous).await;
    assert_eq!(desc["data"][0]["comment"], "Thanks");

    let comment_uri = format!("/api/v1/comments/{}", first["data"]["id"].as_str().unwrap());

    let (status, _) = app
        .put(&comment_uri, As::User(OWNER), json!({ "comment": "not mine" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(&comment_uri, As::User(OTHER), json!({ "comment": "edited" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["comment"], "edited");
    assert_eq!(updated["data"]["time"], first["data"]["time"]);

    let (status, shown) = app.get(&comment_uri, As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["data"]["comment"], "edited");

    let (status, _) = app.delete(&comment_uri, As::Sysadmin(ADMIN)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&comment_uri, As::Anonymous).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let app = setup_test_app();
    let id = app.create_request(As::User(OWNER), "Quiet").await;

    let (status, json) = app
        .post(
            &format!("/api/v1/datarequests/{}/comments", id),
            As::User(OTHER),
            json!({ "comment": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"]["details"]["comment"].is_array());
}

#[tokio::test]
async fn test_deleting_request_removes_its_comments() {
    let app = setup_test_app();
    let id = app.create_request(As::User(OWNER), "Cascade").await;
    let (_, comment) = app
        .post(
            &format!("/api/v1/datarequests/{}/comments", id),
            As::User(OTHER),
            json!({ "comment": "soon gone" }),
        )
        .await;

    app.delete(&format!("/api/v1/datarequests/{}", id), As::User(OWNER))
        .await;

    let (status, _) = app
        .get(
            &format!("/api/v1/comments/{}", comment["data"]["id"].as_str().unwrap()),
            As::Anonymous,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_votes() {
    let app = setup_test_app();
    let id = app.create_request(As::User(OWNER), "Popular").await;
    let votes = format!("/api/v1/datarequests/{}/votes", id);

    let (status, json) = app.post(&votes, As::User(OTHER), json!({ "vote": 1 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["vote"], 1);
    assert_eq!(json["data"]["user_id"], OTHER);

    let (status, json) = app.post(&votes, As::User(OTHER), json!({ "vote": 3 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"]["details"]["vote"].is_array());

    let (status, _) = app.post(&votes, As::Anonymous, json!({ "vote": -1 })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
