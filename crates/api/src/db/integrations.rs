//! Shopify integration repository.
//!
//! Typed access to the `shopifyintegration` collection.

use serde_json::Value;
use shopsync_core::{Collection, DocumentId, ShopDomain, ShopifyIntegration};

use super::{DocumentStore, RepositoryError};

/// An integration together with its document id.
#[derive(Debug, Clone)]
pub struct StoredIntegration {
    pub id: DocumentId,
    pub integration: ShopifyIntegration,
}

/// Repository for Shopify integration documents.
pub struct IntegrationRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> IntegrationRepository<'a> {
    /// Create a new integration repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get the integration for a store domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored body does not decode.
    pub async fn get_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<StoredIntegration>, RepositoryError> {
        let Some(doc) = self
            .store
            .find_one(Collection::ShopifyIntegration, "domain", domain.as_str())
            .await?
        else {
            return Ok(None);
        };

        let integration = serde_json::from_value(doc.body).map_err(|e| {
            RepositoryError::DataCorruption(format!("integration {}: {e}", doc.id))
        })?;

        Ok(Some(StoredIntegration {
            id: doc.id,
            integration,
        }))
    }

    /// Get the document id stored for a domain without decoding its body.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id_by_domain(
        &self,
        domain: &ShopDomain,
    ) -> Result<Option<DocumentId>, RepositoryError> {
        Ok(self
            .store
            .find_one(Collection::ShopifyIntegration, "domain", domain.as_str())
            .await?
            .map(|doc| doc.id))
    }

    /// Insert a new integration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the domain is already stored.
    pub async fn create(
        &self,
        integration: &ShopifyIntegration,
    ) -> Result<DocumentId, RepositoryError> {
        let body = serde_json::to_value(integration)?;
        self.store
            .insert(Collection::ShopifyIntegration, body)
            .await
    }

    /// Overwrite every field of an existing integration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn replace(
        &self,
        id: DocumentId,
        integration: &ShopifyIntegration,
    ) -> Result<bool, RepositoryError> {
        let body = serde_json::to_value(integration)?;
        self.store
            .replace(Collection::ShopifyIntegration, id, body)
            .await
    }

    /// Record the human readable store name for a domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_store_name(
        &self,
        domain: &ShopDomain,
        store_name: &str,
    ) -> Result<bool, RepositoryError> {
        self.store
            .set_field(
                Collection::ShopifyIntegration,
                ("domain", domain.as_str()),
                "store_name",
                Value::String(store_name.to_string()),
            )
            .await
    }
}
