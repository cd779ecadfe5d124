//! Backend diagnostics for the `/test` endpoint.
//!
//! Building the report never fails: probe errors are folded into the
//! `database` field, truncated to [`PROBE_ERROR_LIMIT`] characters.

use serde::Serialize;

use crate::config::ApiConfig;
use crate::db::{Persistence, RepositoryError};

/// Maximum characters of a probe error included in the report.
pub const PROBE_ERROR_LIMIT: usize = 60;

/// Maximum collection names listed.
const COLLECTION_LIMIT: usize = 10;

const NOT_SET: &str = "❌ Not Set";

/// `database` value when no store handle exists.
const NOT_INITIALIZED: &str = "⚠️ Available but not initialized";

/// Health and configuration report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Build the health report, probing the backing store if one is configured.
pub async fn health_report(config: &ApiConfig, persistence: &Persistence) -> HealthReport {
    let mut report = HealthReport {
        backend: "✅ Running".to_string(),
        database: NOT_INITIALIZED.to_string(),
        database_url: if config.database_url.is_some() {
            "✅ Set".to_string()
        } else {
            NOT_SET.to_string()
        },
        database_name: config
            .database_name
            .clone()
            .unwrap_or_else(|| NOT_SET.to_string()),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Some(store) = persistence.store() else {
        return report;
    };

    report.connection_status = "Connected".to_string();
    match probe(store.list_collections(COLLECTION_LIMIT).await) {
        Ok(collections) => {
            report.collections = collections;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(message) => {
            tracing::warn!(error = %message, "Database probe failed");
            report.database = format!("⚠️ Connected but Error: {message}");
        }
    }

    report
}

/// Turn a probe result into either collection names or a truncated message.
fn probe(result: Result<Vec<String>, RepositoryError>) -> Result<Vec<String>, String> {
    result.map_err(|e| e.to_string().chars().take(PROBE_ERROR_LIMIT).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use shopsync_core::{Collection, DocumentId};

    use super::*;
    use crate::db::{DocumentStore, MemoryDocumentStore, StoredDocument};

    /// A store whose every call fails with a long error.
    struct BrokenStore;

    fn broken<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::DataCorruption(
            "connection refused while talking to the database at 10.0.0.1:5432 (os error 111)"
                .to_string(),
        ))
    }

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn insert(&self, _: Collection, _: Value) -> Result<DocumentId, RepositoryError> {
            broken()
        }

        async fn find_one(
            &self,
            _: Collection,
            _: &str,
            _: &str,
        ) -> Result<Option<StoredDocument>, RepositoryError> {
            broken()
        }

        async fn replace(
            &self,
            _: Collection,
            _: DocumentId,
            _: Value,
        ) -> Result<bool, RepositoryError> {
            broken()
        }

        async fn set_field(
            &self,
            _: Collection,
            _: (&str, &str),
            _: &str,
            _: Value,
        ) -> Result<bool, RepositoryError> {
            broken()
        }

        async fn list_collections(&self, _: usize) -> Result<Vec<String>, RepositoryError> {
            broken()
        }
    }

    fn config(vars: &[(&str, &str)]) -> ApiConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_report_without_database() {
        let report = health_report(&config(&[]), &Persistence::Absent).await;

        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.database, "⚠️ Available but not initialized");
        assert_eq!(report.database_url, "❌ Not Set");
        assert_eq!(report.database_name, "❌ Not Set");
        assert_eq!(report.connection_status, "Not Connected");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn test_report_with_unusable_url_is_not_initialized() {
        let config = config(&[("DATABASE_URL", "not a url"), ("DATABASE_NAME", "shop")]);
        let persistence = crate::db::open(&config);

        let report = health_report(&config, &persistence).await;

        assert_eq!(report.database, NOT_INITIALIZED);
        assert_eq!(report.database_url, "✅ Set");
        assert_eq!(report.database_name, "shop");
        assert_eq!(report.connection_status, "Not Connected");
    }

    #[tokio::test]
    async fn test_report_with_working_store() {
        let store = MemoryDocumentStore::new();
        store
            .insert(Collection::ShopifyIntegration, json!({"domain": "a"}))
            .await
            .unwrap();

        let report = health_report(
            &config(&[("DATABASE_URL", "postgres://x"), ("DATABASE_NAME", "shopsync")]),
            &Persistence::connected(store),
        )
        .await;

        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.database_url, "✅ Set");
        assert_eq!(report.database_name, "shopsync");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.collections, vec!["shopifyintegration"]);
    }

    #[tokio::test]
    async fn test_report_truncates_probe_error() {
        let report = health_report(&config(&[]), &Persistence::connected(BrokenStore)).await;

        let message = report
            .database
            .strip_prefix("⚠️ Connected but Error: ")
            .unwrap();
        assert_eq!(message.chars().count(), PROBE_ERROR_LIMIT);
        assert!(message.starts_with("data corruption: connection refused"));
        assert!(report.collections.is_empty());
    }

    #[test]
    fn test_report_serializes_expected_keys() {
        let report = HealthReport {
            backend: String::new(),
            database: String::new(),
            database_url: String::new(),
            database_name: String::new(),
            connection_status: String::new(),
            collections: Vec::new(),
        };
        let json = serde_json::to_value(report).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "backend",
            "database",
            "database_url",
            "database_name",
            "connection_status",
            "collections",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
