//! Persisted document models.

use serde::{Deserialize, Serialize};

use super::domain::ShopDomain;

/// Stored credentials for one Shopify store.
///
/// Collection: `shopifyintegration`. At most one record exists per
/// normalized domain.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopifyIntegration {
    /// Canonical store domain (unique key).
    pub domain: ShopDomain,
    /// Admin API access token (redacted in debug output).
    pub access_token: String,
    /// Human readable store name, known after a successful verification.
    #[serde(default)]
    pub store_name: Option<String>,
    /// Granted Admin API scopes. Reserved: nothing writes this yet.
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
}

impl ShopifyIntegration {
    /// Create a record with only the credentials set.
    #[must_use]
    pub const fn new(domain: ShopDomain, access_token: String) -> Self {
        Self {
            domain,
            access_token,
            store_name: None,
            scopes: None,
        }
    }
}

impl std::fmt::Debug for ShopifyIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyIntegration")
            .field("domain", &self.domain)
            .field("access_token", &"[REDACTED]")
            .field("store_name", &self.store_name)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Cached copy of the last summary computed for a store.
///
/// Collection: `datasnapshot`. Each write replaces the previous payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    /// Store the snapshot belongs to.
    pub domain: ShopDomain,
    /// Summary payload.
    pub data: serde_json::Value,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let integration =
            ShopifyIntegration::new(ShopDomain::normalize("acme"), "shpat_secret".to_string());
        let debug = format!("{integration:?}");
        assert!(!debug.contains("shpat_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_serializes_every_field() {
        let integration =
            ShopifyIntegration::new(ShopDomain::normalize("acme"), "token".to_string());
        let json = serde_json::to_value(&integration).unwrap();
        assert_eq!(
            json,
            json!({
                "domain": "acme.myshopify.com",
                "access_token": "token",
                "store_name": null,
                "scopes": null,
            })
        );
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let integration: ShopifyIntegration = serde_json::from_value(json!({
            "domain": "acme.myshopify.com",
            "access_token": "token",
        }))
        .unwrap();
        assert_eq!(integration.store_name, None);
        assert_eq!(integration.scopes, None);
    }
}
