//! Shopify integration routes.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shopsync_core::{DocumentId, ShopDomain, Summary};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Build the Shopify router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shopify/connect", post(connect))
        .route("/shopify/summary", get(summary))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /shopify/connect`.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Deserialize)]
pub struct ConnectRequest {
    pub domain: String,
    pub access_token: String,
}

impl std::fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("domain", &self.domain)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /shopify/connect`.
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub ok: bool,
    pub id: DocumentId,
    pub domain: ShopDomain,
    pub verified: bool,
    pub store_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub domain: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// POST /shopify/connect - Store credentials and verify them against Shopify.
#[instrument(skip(state, payload))]
async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Json<ConnectResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Unprocessable(e.body_text()))?;

    let outcome = state
        .integrations()
        .connect(&request.domain, SecretString::from(request.access_token))
        .await;

    tracing::info!(
        domain = %outcome.domain,
        verified = outcome.verified,
        "Store connected"
    );

    Ok(Json(ConnectResponse {
        ok: true,
        id: outcome.id,
        domain: outcome.domain,
        verified: outcome.verified,
        store_name: outcome.store_name,
    }))
}

/// GET /shopify/summary?domain= - Aggregated products, orders, and customers.
#[instrument(skip(state, params))]
async fn summary(
    State(state): State<AppState>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Json<Summary>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Unprocessable(e.body_text()))?;

    let summary = state.integrations().summary(&params.domain).await?;
    Ok(Json(summary))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_request_debug_redacts_token() {
        let request: ConnectRequest = serde_json::from_str(
            r#"{"domain": "acme", "access_token": "shpat_secret"}"#,
        )
        .unwrap();

        let debug = format!("{request:?}");
        assert!(debug.contains("acme"));
        assert!(!debug.contains("shpat_secret"));
    }

    #[test]
    fn test_connect_response_shape() {
        let response = ConnectResponse {
            ok: true,
            id: DocumentId::new(),
            domain: ShopDomain::normalize("acme"),
            verified: false,
            store_name: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["domain"], "acme.myshopify.com");
        assert!(json["id"].is_string());
        assert!(json["store_name"].is_null());
    }
}
