//! Integration tests for cross-origin handling and request ids.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use shopsync_api::middleware::REQUEST_ID_HEADER;
use shopsync_integration_tests::TestContext;

#[tokio::test]
async fn test_preflight_mirrors_origin_with_credentials() {
    let ctx = TestContext::without_database().await;

    let resp = ctx
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/shopify/connect")
                .header(header::ORIGIN, "https://dashboard.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.header("access-control-allow-origin"),
        Some("https://dashboard.example.com")
    );
    assert_eq!(
        resp.header("access-control-allow-credentials"),
        Some("true")
    );
    assert_eq!(resp.header("access-control-allow-methods"), Some("POST"));
}

#[tokio::test]
async fn test_simple_request_gets_cors_headers() {
    let ctx = TestContext::without_database().await;

    let resp = ctx
        .send(
            Request::get("/")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.header("access-control-allow-origin"),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let ctx = TestContext::without_database().await;

    let resp = ctx.get("/health").await;

    let id = resp.header(REQUEST_ID_HEADER).unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let ctx = TestContext::without_database().await;

    let resp = ctx
        .send(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "upstream-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(resp.header(REQUEST_ID_HEADER), Some("upstream-123"));
}
