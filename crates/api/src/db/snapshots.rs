//! Data snapshot repository.
//!
//! The `datasnapshot` collection is a cache of the last summary per store,
//! not an audit log: writes replace the previous payload.

use shopsync_core::{Collection, DataSnapshot, DocumentId};

use super::{DocumentStore, RepositoryError};

/// Repository for cached summary snapshots.
pub struct SnapshotRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> SnapshotRepository<'a> {
    /// Create a new snapshot repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Save or replace the snapshot for a store domain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, snapshot: &DataSnapshot) -> Result<DocumentId, RepositoryError> {
        let body = serde_json::to_value(snapshot)?;

        let existing = self
            .store
            .find_one(Collection::DataSnapshot, "domain", snapshot.domain.as_str())
            .await?;

        match existing {
            Some(doc) => {
                self.store
                    .replace(Collection::DataSnapshot, doc.id, body)
                    .await?;
                Ok(doc.id)
            }
            None => self.store.insert(Collection::DataSnapshot, body).await,
        }
    }
}
