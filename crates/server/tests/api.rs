//! HTTP-layer tests for request validation and the error envelope.
//!
//! These exercise the paths that never contact Shopify: a request with a
//! missing or blank identifier must come back as a 400 JSON envelope before
//! any remote call is attempted.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use callshelf_server::config::{ServerConfig, ShopifyConfig};
use callshelf_server::state::AppState;

fn test_app() -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        shopify: ShopifyConfig {
            store: "test.myshopify.com".to_string(),
            api_version: "2025-04".to_string(),
            admin_token: SecretString::from("shpat_47c1e2a9b3f8d105"),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    let state = AppState::new(config).expect("state builds");
    callshelf_server::app(state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, b"ok");
}

#[tokio::test]
async fn test_service_banner() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(read_body(response).await).expect("utf-8");
    assert!(body.contains("running"));
}

#[tokio::test]
async fn test_mark_call_read_missing_fields() {
    let response = test_app()
        .oneshot(post_json("/api/mark-call-read", "{}"))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing customer_id or call_id");
}

#[tokio::test]
async fn test_pin_call_blank_customer_id() {
    let response = test_app()
        .oneshot(post_json(
            "/api/pin-call",
            r#"{"customer_id": "  ", "call_id": "call_1"}"#,
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error is a string")
            .contains("customer id")
    );
}

#[tokio::test]
async fn test_unpin_call_blank_call_id() {
    let response = test_app()
        .oneshot(post_json(
            "/api/unpin-call",
            r#"{"customer_id": "8412398572", "call_id": ""}"#,
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error is a string")
            .contains("call_id")
    );
}

#[tokio::test]
async fn test_get_read_calls_missing_customer_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/get-read-calls")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing customer_id");
}

#[tokio::test]
async fn test_get_pinned_calls_missing_customer_id() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/get-pinned-calls")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_info_missing_customer_id() {
    let response = test_app()
        .oneshot(post_json(
            "/api/update-user-info",
            r#"{"first_name": "Ada"}"#,
        ))
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing customer_id");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("handler runs");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
