//! Persistence adapter.
//!
//! Documents are JSON bodies grouped into logical [`Collection`]s. The
//! [`DocumentStore`] trait exposes the handful of create/read/update
//! operations the service needs; [`Persistence`] wraps an optional store so
//! that "no database configured" is an explicit variant instead of a null
//! handle.
//!
//! # Backends
//!
//! - [`PgDocumentStore`] - `PostgreSQL`, one `documents` table with a JSONB body
//! - [`MemoryDocumentStore`] - process-local, used in tests and local runs
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopsync-cli -- migrate
//! ```

pub mod integrations;
pub mod memory;
pub mod postgres;
pub mod snapshots;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value;
use shopsync_core::{Collection, DocumentId};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

use crate::config::ApiConfig;

pub use integrations::IntegrationRepository;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use snapshots::SnapshotRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A document could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Constraint violation (e.g., a second integration for one domain).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// No backing store is configured.
    #[error("persistence unavailable")]
    Unavailable,
}

/// A document as held by the backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub collection: Collection,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generic document operations keyed by collection.
///
/// Filters are single-field equality matches against a top-level string
/// field of the body (in practice always `domain`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its id.
    async fn insert(&self, collection: Collection, body: Value)
    -> Result<DocumentId, RepositoryError>;

    /// Find the first document whose `field` equals `value`.
    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, RepositoryError>;

    /// Replace the body of a document. Returns `false` if no such document exists.
    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        body: Value,
    ) -> Result<bool, RepositoryError>;

    /// Set one top-level field on the first document matching `filter_field == filter_value`.
    ///
    /// Returns `false` if nothing matched.
    async fn set_field(
        &self,
        collection: Collection,
        filter: (&str, &str),
        field: &str,
        value: Value,
    ) -> Result<bool, RepositoryError>;

    /// List up to `limit` collection names present in the store.
    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, RepositoryError>;
}

/// Persistence capability handed to the service.
#[derive(Clone)]
pub enum Persistence {
    /// A backing store is configured.
    Connected(Arc<dyn DocumentStore>),
    /// No backing store: reads find nothing and writes are dropped.
    Absent,
}

impl Persistence {
    /// Wrap a concrete store.
    #[must_use]
    pub fn connected(store: impl DocumentStore + 'static) -> Self {
        Self::Connected(Arc::new(store))
    }

    /// Get the store, if one is configured.
    #[must_use]
    pub fn store(&self) -> Option<&dyn DocumentStore> {
        match self {
            Self::Connected(store) => Some(store.as_ref()),
            Self::Absent => None,
        }
    }

    /// Whether a store handle exists.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected(_) => f.write_str("Persistence::Connected"),
            Self::Absent => f.write_str("Persistence::Absent"),
        }
    }
}

/// Create a `PostgreSQL` connection pool without connecting.
///
/// Connections are established on first use, so an unreachable database shows
/// up in diagnostics instead of aborting startup. `database_name`, when set,
/// overrides the database named in the URL.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_pool(
    database_url: &secrecy::SecretString,
    database_name: Option<&str>,
) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(database_url.expose_secret())?;
    if let Some(name) = database_name {
        options = options.database(name);
    }

    Ok(PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}

/// Open the configured persistence backend.
///
/// Without `DATABASE_URL`, or with one that cannot be parsed, the service runs
/// with [`Persistence::Absent`].
#[must_use]
pub fn open(config: &ApiConfig) -> Persistence {
    let Some(database_url) = config.database_url.as_ref() else {
        tracing::warn!("DATABASE_URL not set, running without persistence");
        return Persistence::Absent;
    };

    match create_pool(database_url, config.database_name.as_deref()) {
        Ok(pool) => {
            tracing::info!("Database pool created");
            Persistence::connected(PgDocumentStore::new(pool))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid DATABASE_URL, running without persistence");
            Persistence::Absent
        }
    }
}
