use std::{collections::HashMap, sync::Arc};

use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    created: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
}

async fn list_users() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Leanne Graham", "email": "leanne@april.biz", "username": "Bret"},
        {"id": 2, "name": "Ervin Howell", "email": "ervin@melissa.tv"}
    ]))
}

async fn list_posts(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    match query.get("userId").map(String::as_str) {
        Some("1") => Json(json!([
            {"id": 10, "userId": 1, "title": "first", "body": "hello"}
        ]))
        .into_response(),
        Some("2") => Json(json!([])).into_response(),
        Some("3") => Json(json!({"posts": []})).into_response(),
        Some("4") => Json(json!({"error": "user archived"})).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn list_comments(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    match query.get("postId").map(String::as_str) {
        Some("10") => Json(json!([
            {"id": 100, "postId": 10, "name": "Jo", "email": "jo@x.co", "body": "Hi"}
        ]))
        .into_response(),
        _ => (StatusCode::OK, "not json").into_response(),
    }
}

async fn create_comment(State(state): State<ServerState>, Json(payload): Json<Value>) -> Json<Value> {
    state.created.lock().await.push(payload.clone());
    let body = payload["body"].as_str().map(str::to_owned);
    match body.as_deref() {
        Some("reject me") => Json(json!({"error": "comment rejected"})),
        Some("no id") => Json(json!({"postId": payload["postId"], "body": "no id"})),
        _ => {
            let mut stored = payload;
            stored["id"] = json!(5);
            Json(stored)
        }
    }
}

async fn delete_comment(State(state): State<ServerState>, Path(id): Path<i64>) -> impl IntoResponse {
    state.deleted.lock().await.push(id);
    match id {
        1 => StatusCode::OK.into_response(),
        2 => Json(json!({"error": "cannot delete"})).into_response(),
        3 => Json(json!(1)).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_api_server() -> (HttpResourceClient, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/users", get(list_users))
        .route("/api/posts", get(list_posts))
        .route("/api/comments", get(list_comments).post(create_comment))
        .route("/api/comments/:id", delete(delete_comment))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (HttpResourceClient::new(format!("http://{addr}/api/")), state)
}

#[tokio::test]
async fn lists_users_with_optional_fields() {
    let (client, _) = spawn_api_server().await;
    let users = client.list_users().await.expect("users");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username.as_deref(), Some("Bret"));
    assert_eq!(users[1].id, UserId(2));
}

#[tokio::test]
async fn lists_posts_by_user_query() {
    let (client, _) = spawn_api_server().await;
    let posts = client.list_posts(UserId(1)).await.expect("posts");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].user_id, UserId(1));
    assert!(client.list_posts(UserId(2)).await.expect("empty").is_empty());
}

#[tokio::test]
async fn non_array_posts_payload_is_malformed() {
    let (client, _) = spawn_api_server().await;
    let err = client.list_posts(UserId(3)).await.expect_err("object body");
    assert!(
        matches!(err, ClientError::MalformedPayload { expected: "array", .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn error_indicator_and_http_failure_both_reject() {
    let (client, _) = spawn_api_server().await;
    let err = client.list_posts(UserId(4)).await.expect_err("error body");
    assert!(err.is_rejection(), "unexpected error: {err}");

    let err = client.list_posts(UserId(99)).await.expect_err("500");
    assert!(
        matches!(err, ClientError::Status { status, .. } if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn undecodable_comments_body_is_a_decode_error() {
    let (client, _) = spawn_api_server().await;
    let comments = client.list_comments(PostId(10)).await.expect("comments");
    assert_eq!(comments[0].post_id, PostId(10));

    let err = client.list_comments(PostId(11)).await.expect_err("text body");
    assert!(matches!(err, ClientError::Decode { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn create_posts_camel_case_payload_and_returns_stored_comment() {
    let (client, state) = spawn_api_server().await;
    let created = client
        .create_comment(&NewComment {
            post_id: PostId(10),
            name: "Jo".to_string(),
            email: "jo@x.co".to_string(),
            body: "Hi".to_string(),
        })
        .await
        .expect("created");

    assert_eq!(created.id, CommentId(5));
    assert_eq!(created.body, "Hi");
    let sent = state.created.lock().await;
    assert_eq!(sent[0]["postId"], 10);
}

#[tokio::test]
async fn create_rejects_error_payload_and_missing_id() {
    let (client, _) = spawn_api_server().await;
    let mut comment = NewComment {
        post_id: PostId(10),
        name: "Jo".to_string(),
        email: "jo@x.co".to_string(),
        body: "reject me".to_string(),
    };
    let err = client.create_comment(&comment).await.expect_err("rejected");
    assert!(err.is_rejection());

    comment.body = "no id".to_string();
    let err = client.create_comment(&comment).await.expect_err("no id");
    assert!(matches!(err, ClientError::MalformedPayload { expected: "comment", .. }));
}

#[tokio::test]
async fn delete_treats_error_payload_as_failure() {
    let (client, state) = spawn_api_server().await;
    client.delete_comment(CommentId(1)).await.expect("empty body");
    client.delete_comment(CommentId(3)).await.expect("scalar body");
    assert!(client
        .delete_comment(CommentId(2))
        .await
        .expect_err("error body")
        .is_rejection());
    assert!(client.delete_comment(CommentId(4)).await.is_err());
    assert_eq!(*state.deleted.lock().await, vec![1, 3, 2, 4]);
}

#[test]
fn base_url_drops_trailing_slash() {
    let client = HttpResourceClient::new("http://example.test/api//");
    assert_eq!(client.base_url(), "http://example.test/api");
    assert_eq!(client.url("users"), "http://example.test/api/users");
}
