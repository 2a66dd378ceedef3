// Router-level status mapping over the in-memory backend.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use vidhub::config::{Config, DatabaseConfig, PaginationConfig, ServerConfig};
use vidhub::{api, AppState};

const USER: &str = "00000000000000aa";

fn test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: "memory:".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 2,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shard_id: 0,
        },
        pagination: PaginationConfig {
            default_per_page: 10,
            max_per_page: 100,
        },
    }
}

async fn app() -> axum::Router {
    let state = AppState::new(test_config()).await.unwrap();
    api::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = app().await.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let response = app()
        .await
        .oneshot(get("/api/v1/videos/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn well_formed_absent_id_is_not_found() {
    let response = app()
        .await
        .oneshot(get("/api/v1/videos/00000000000000ff"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identity_header_is_unauthorized() {
    let response = app()
        .await
        .oneshot(post_json("/api/v1/tweets", None, r#"{"content":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_like_target_is_a_bad_request() {
    let response = app()
        .await
        .oneshot(post_json(
            "/api/v1/likes/photo/00000000000000ff/toggle",
            Some(USER),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_positive_page_is_a_bad_request() {
    let response = app()
        .await
        .oneshot(get("/api/v1/videos?page=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tweet_create_and_list_round_trip() {
    let app = app().await;

    let created = app
        .clone()
        .oneshot(post_json("/api/v1/tweets", Some(USER), r#"{"content":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = app
        .oneshot(get(&format!("/api/v1/users/{}/tweets", USER)))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
}

#[tokio::test]
async fn like_toggle_is_ok_for_a_known_target() {
    let app = app().await;
    let response = app
        .oneshot(post_json(
            "/api/v1/likes/video/00000000000000ff/toggle",
            Some(USER),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stats_endpoint_is_ok_for_an_empty_channel() {
    let response = app()
        .await
        .oneshot(get("/api/v1/channels/00000000000000ff/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
