//! Shopify Admin REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shopsync_core::ShopDomain;
use tracing::{debug, instrument, warn};

use super::{API_VERSION, AdminApi, UpstreamError};

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Timeout applied to every Admin API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Characters of an error response body kept in [`UpstreamError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Shopify Admin REST API client.
///
/// Stateless apart from the pooled HTTP client; the store domain and access
/// token are supplied per call.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    client: reqwest::Client,
    /// Fixed origin used instead of `https://{domain}` (proxies and tests).
    origin: Option<String>,
}

impl ShopifyClient {
    /// Create a client that talks to `https://{domain}`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Client` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            origin: None,
        })
    }

    /// Create a client that sends every request to `origin`, whatever the domain.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::Client` if the HTTP client cannot be built.
    pub fn with_origin(origin: impl Into<String>) -> Result<Self, UpstreamError> {
        let mut client = Self::new()?;
        client.origin = Some(origin.into().trim_end_matches('/').to_string());
        Ok(client)
    }

    /// Build the request URL for a resource.
    fn url(&self, domain: &ShopDomain, resource: &str) -> String {
        let origin = self
            .origin
            .clone()
            .unwrap_or_else(|| format!("https://{domain}"));
        format!("{origin}/admin/api/{API_VERSION}/{resource}")
    }
}

#[async_trait]
impl AdminApi for ShopifyClient {
    #[instrument(skip(self, access_token, query), fields(domain = %domain))]
    async fn get(
        &self,
        domain: &ShopDomain,
        access_token: &SecretString,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(self.url(domain, resource))
            .header(ACCESS_TOKEN_HEADER, access_token.expose_secret())
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Shopify request failed");
                UpstreamError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            let body: String = text.chars().take(ERROR_BODY_LIMIT).collect();
            warn!(status = status.as_u16(), "Shopify returned an error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        debug!("Shopify request succeeded");
        Ok(body)
    }
}
