//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, test_config};

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = build_test_app(test_config());
    let response = get(app.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn health_check_is_public_in_interactive_mode() {
    let mut config = test_config();
    config.auth.mode = registrar_api::config::AuthMode::Interactive;
    let app = build_test_app(config);

    assert_eq!(get(app.app(), "/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(test_config());
    let response = get(app.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(test_config());
    let response = get(app.app(), "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = build_test_app(test_config());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/students")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = common::send(app.app(), request).await;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
}
