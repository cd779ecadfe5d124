//! Store integration use cases.
//!
//! - `connect` stores (or replaces) a store's credentials, then verifies them
//!   against `shop.json`. Storing and verifying are independent: bad
//!   credentials are still saved so they can be corrected later.
//! - `summary` fetches products, orders, and customers concurrently and falls
//!   back to demo data only when all three calls fail. The result is cached
//!   as a snapshot on a best-effort basis.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shopsync_core::{DataSnapshot, DocumentId, ShopDomain, ShopifyIntegration, Summary};
use tracing::{debug, info, instrument, warn};

use crate::db::integrations::StoredIntegration;
use crate::db::{IntegrationRepository, Persistence, RepositoryError, SnapshotRepository};
use crate::shopify::{AdminApi, UpstreamError};

use super::ServiceError;

/// One Admin API list resource included in the summary.
struct Resource {
    path: &'static str,
    /// Key of the list inside the response body.
    key: &'static str,
    query: &'static [(&'static str, &'static str)],
}

const PRODUCTS: Resource = Resource {
    path: "products.json",
    key: "products",
    query: &[("limit", "5")],
};

const ORDERS: Resource = Resource {
    path: "orders.json",
    key: "orders",
    query: &[("limit", "5"), ("status", "any")],
};

const CUSTOMERS: Resource = Resource {
    path: "customers.json",
    key: "customers",
    query: &[("limit", "5")],
};

/// Result of connecting a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Id of the stored (or, without persistence, would-be) integration.
    pub id: DocumentId,
    pub domain: ShopDomain,
    /// Whether `shop.json` answered successfully with the given token.
    pub verified: bool,
    /// Shop name reported by Shopify, if verification succeeded.
    pub store_name: Option<String>,
}

/// Connect and summary use cases.
#[derive(Clone)]
pub struct IntegrationService {
    persistence: Persistence,
    shopify: Arc<dyn AdminApi>,
}

impl IntegrationService {
    /// Create a new service.
    #[must_use]
    pub fn new(persistence: Persistence, shopify: Arc<dyn AdminApi>) -> Self {
        Self {
            persistence,
            shopify,
        }
    }

    /// Store a store's credentials and verify them.
    ///
    /// Never fails: persistence problems degrade to an unsaved record and
    /// verification problems to `verified = false`.
    #[instrument(skip(self, access_token))]
    pub async fn connect(&self, raw_domain: &str, access_token: SecretString) -> ConnectOutcome {
        let domain = ShopDomain::normalize(raw_domain);

        let id = self
            .save_integration(&domain, &access_token)
            .await
            .unwrap_or_else(|e| {
                warn!(domain = %domain, error = %e, "Integration not persisted");
                DocumentId::new()
            });

        let (verified, store_name) = match self
            .shopify
            .get(&domain, &access_token, "shop.json", &[])
            .await
        {
            Ok(body) => (true, shop_name(&body)),
            Err(e) => {
                info!(domain = %domain, error = %e, "Credential verification failed");
                (false, None)
            }
        };

        if let Some(name) = &store_name {
            if let Err(e) = self.record_store_name(&domain, name).await {
                warn!(domain = %domain, error = %e, "Store name not persisted");
            }
        }

        ConnectOutcome {
            id,
            domain,
            verified,
            store_name,
        }
    }

    /// Build the summary for a connected store.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no integration is stored for the
    /// normalized domain.
    #[instrument(skip(self))]
    pub async fn summary(&self, raw_domain: &str) -> Result<Summary, ServiceError> {
        let domain = ShopDomain::normalize(raw_domain);

        let integration = self
            .find_integration(&domain)
            .await
            .ok_or(ServiceError::NotFound)?
            .integration;
        let token = SecretString::from(integration.access_token);

        let (products, orders, customers) = tokio::join!(
            self.fetch(&domain, &token, &PRODUCTS),
            self.fetch(&domain, &token, &ORDERS),
            self.fetch(&domain, &token, &CUSTOMERS),
        );

        let summary = assemble(products, orders, customers);
        if summary.demo {
            info!(domain = %domain, "All Shopify calls failed, serving demo data");
        }

        // Best effort: the snapshot is a cache and must not affect the response.
        if let Err(e) = self.cache_snapshot(&domain, &summary).await {
            warn!(domain = %domain, error = %e, "Snapshot not cached");
        }

        Ok(summary)
    }

    /// Insert the integration, or replace the existing one for this domain.
    ///
    /// An existing record is overwritten by id, so a body that no longer
    /// decodes is repaired. Losing an insert race to another connect for the
    /// same domain falls back to replacing the winner's record.
    async fn save_integration(
        &self,
        domain: &ShopDomain,
        access_token: &SecretString,
    ) -> Result<DocumentId, RepositoryError> {
        let store = self.persistence.store().ok_or(RepositoryError::Unavailable)?;
        let repo = IntegrationRepository::new(store);
        let integration =
            ShopifyIntegration::new(domain.clone(), access_token.expose_secret().to_string());

        if let Some(id) = repo.find_id_by_domain(domain).await? {
            return replace_integration(&repo, id, &integration).await;
        }

        match repo.create(&integration).await {
            Ok(id) => {
                debug!(id = %id, "Integration created");
                Ok(id)
            }
            Err(RepositoryError::Conflict(_)) => {
                let id = repo
                    .find_id_by_domain(domain)
                    .await?
                    .ok_or_else(|| RepositoryError::Conflict(domain.to_string()))?;
                debug!(id = %id, "Lost insert race, replacing existing integration");
                replace_integration(&repo, id, &integration).await
            }
            Err(e) => Err(e),
        }
    }

    async fn record_store_name(
        &self,
        domain: &ShopDomain,
        store_name: &str,
    ) -> Result<bool, RepositoryError> {
        let store = self.persistence.store().ok_or(RepositoryError::Unavailable)?;
        IntegrationRepository::new(store)
            .set_store_name(domain, store_name)
            .await
    }

    /// Look up an integration. Lookup failures read as "not found".
    async fn find_integration(&self, domain: &ShopDomain) -> Option<StoredIntegration> {
        let store = self.persistence.store()?;
        IntegrationRepository::new(store)
            .get_by_domain(domain)
            .await
            .unwrap_or_else(|e| {
                warn!(domain = %domain, error = %e, "Integration lookup failed");
                None
            })
    }

    async fn fetch(
        &self,
        domain: &ShopDomain,
        token: &SecretString,
        resource: &Resource,
    ) -> Result<Vec<Value>, UpstreamError> {
        let body = self
            .shopify
            .get(domain, token, resource.path, resource.query)
            .await
            .inspect_err(|e| {
                warn!(resource = resource.path, error = %e, "Shopify fetch failed");
            })?;

        Ok(body
            .get(resource.key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn cache_snapshot(
        &self,
        domain: &ShopDomain,
        summary: &Summary,
    ) -> Result<DocumentId, RepositoryError> {
        let store = self.persistence.store().ok_or(RepositoryError::Unavailable)?;
        let snapshot = DataSnapshot {
            domain: domain.clone(),
            data: serde_json::to_value(summary)?,
        };
        SnapshotRepository::new(store).upsert(&snapshot).await
    }
}

async fn replace_integration(
    repo: &IntegrationRepository<'_>,
    id: DocumentId,
    integration: &ShopifyIntegration,
) -> Result<DocumentId, RepositoryError> {
    repo.replace(id, integration).await?;
    debug!(id = %id, "Integration updated");
    Ok(id)
}

/// Extract `shop.name` from a `shop.json` response. Empty names count as absent.
fn shop_name(body: &Value) -> Option<String> {
    body.get("shop")
        .and_then(|shop| shop.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// Combine the three fetches. Demo data only when every fetch failed.
fn assemble(
    products: Result<Vec<Value>, UpstreamError>,
    orders: Result<Vec<Value>, UpstreamError>,
    customers: Result<Vec<Value>, UpstreamError>,
) -> Summary {
    if products.is_err() && orders.is_err() && customers.is_err() {
        return Summary::demo();
    }

    Summary::live(
        products.unwrap_or_default(),
        orders.unwrap_or_default(),
        customers.unwrap_or_default(),
    )
}
