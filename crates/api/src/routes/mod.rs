//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Liveness message
//! GET  /health             - Plain-text liveness probe
//! GET  /test               - Backend and database diagnostics
//!
//! # Shopify
//! POST /shopify/connect    - Store and verify store credentials
//! GET  /shopify/summary    - Products/orders/customers summary (?domain=)
//! ```

pub mod diagnostics;
pub mod shopify;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// All routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(diagnostics::router())
        .merge(shopify::router())
}

/// The complete application: routes, request ids, tracing, and CORS.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors_layer())
        .with_state(state)
}
