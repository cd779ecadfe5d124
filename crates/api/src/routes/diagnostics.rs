//! Liveness and diagnostics routes.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tracing::instrument;

use crate::services::diagnostics::{HealthReport, health_report};
use crate::state::AppState;

/// Message returned by `GET /`.
pub const ROOT_MESSAGE: &str = "Shopify Integration Backend Running";

/// Build the diagnostics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/test", get(test_report))
}

/// GET / - Liveness message.
async fn root() -> Json<Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

/// GET /health - Liveness probe.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// GET /test - Backend and database diagnostics. Always 200.
#[instrument(skip(state))]
async fn test_report(State(state): State<AppState>) -> Json<HealthReport> {
    Json(health_report(state.config(), state.persistence()).await)
}
