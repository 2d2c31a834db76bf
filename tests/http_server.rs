//! HTTP front-end tests, driven in-process through the router.

use std::sync::Arc;

use action_router::config::AppConfig;
use action_router::http::HttpServer;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

mod common;
use common::{caller_for, root, route};

fn app() -> Router {
    app_with(AppConfig::default())
}

fn app_with(config: AppConfig) -> Router {
    let caller = caller_for(vec![
        root(),
        route("routes/actions__/recurring", Some("root"), Some("actions__/recurring")),
        route("routes/actions__/item", Some("root"), Some("actions__/item")),
        route("routes/actions__/item/create", Some("routes/actions__/item"), Some("create")),
    ]);
    HttpServer::new(&config, Arc::new(caller)).into_router()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_dispatches_root_action() {
    let response = app().oneshot(post("/", "_action=recurring")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await["route"], "routes/actions__/recurring");
}

#[tokio::test]
async fn test_dispatches_nested_action() {
    let response = app().oneshot(post("/item", "_action=create")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["route"], "routes/actions__/item/create");
}

#[tokio::test]
async fn test_error_statuses() {
    let cases = [
        ("other=1", StatusCode::BAD_REQUEST, "invalid_action"),
        ("_action=", StatusCode::BAD_REQUEST, "empty_action"),
        ("_action=missing", StatusCode::NOT_FOUND, "no_route_match"),
    ];

    for (body, status, kind) in cases {
        let response = app().oneshot(post("/", body)).await.unwrap();

        assert_eq!(response.status(), status, "body {body}");
        let json = json_body(response).await;
        assert_eq!(json["kind"], kind);
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_unsupported_media_type() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("_action=recurring"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_body_over_limit() {
    let mut config = AppConfig::default();
    config.listener.max_body_bytes = 8;

    let response = app_with(config)
        .oneshot(post("/", "_action=recurring"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["kind"], "payload_too_large");
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let mut request = post("/", "_action=recurring");
    request
        .headers_mut()
        .insert("x-request-id", "req-123".parse().unwrap());

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-123");
}
