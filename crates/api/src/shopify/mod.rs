//! Shopify Admin REST API access.
//!
//! Only read-only GET requests are made, always against API version
//! [`API_VERSION`]. Failures are returned as [`UpstreamError`] values and
//! recovered by the caller; nothing here retries or backs off.

mod client;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use shopsync_core::ShopDomain;
use thiserror::Error;

pub use client::ShopifyClient;

/// Admin API version every request is pinned to.
pub const API_VERSION: &str = "2024-04";

/// Errors from a single Admin API call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Shopify answered with a non-200 status.
    ///
    /// `body` holds at most the first 200 characters of the response text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, timeout, reset).
    #[error("{0}")]
    Transport(String),

    /// A 200 response whose body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Decode(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Read-only access to one store's Admin API.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// GET `admin/api/{API_VERSION}/{resource}` on `domain`.
    ///
    /// `query` is passed through verbatim.
    async fn get(
        &self,
        domain: &ShopDomain,
        access_token: &SecretString,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, UpstreamError>;
}
