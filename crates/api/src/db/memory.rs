//! In-memory document store.
//!
//! Keeps documents in insertion order behind an async `RwLock`. Used by the
//! test suites and for running the server locally without `PostgreSQL`.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shopsync_core::{Collection, DocumentId};
use tokio::sync::RwLock;

use super::{DocumentStore, RepositoryError, StoredDocument};

/// Process-local [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents in a collection, oldest first.
    pub async fn documents(&self, collection: Collection) -> Vec<StoredDocument> {
        self.documents
            .read()
            .await
            .iter()
            .filter(|doc| doc.collection == collection)
            .cloned()
            .collect()
    }
}

fn field_matches(doc: &StoredDocument, collection: Collection, field: &str, value: &str) -> bool {
    doc.collection == collection && doc.body.get(field).and_then(Value::as_str) == Some(value)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Value,
    ) -> Result<DocumentId, RepositoryError> {
        let now = Utc::now();
        let id = DocumentId::new();

        self.documents.write().await.push(StoredDocument {
            id,
            collection,
            body,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|doc| field_matches(doc, collection, field, value))
            .cloned())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        body: Value,
    ) -> Result<bool, RepositoryError> {
        let mut documents = self.documents.write().await;
        let Some(doc) = documents
            .iter_mut()
            .find(|doc| doc.collection == collection && doc.id == id)
        else {
            return Ok(false);
        };

        doc.body = body;
        doc.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: (&str, &str),
        field: &str,
        value: Value,
    ) -> Result<bool, RepositoryError> {
        let (filter_field, filter_value) = filter;
        let mut documents = self.documents.write().await;
        let Some(doc) = documents
            .iter_mut()
            .find(|doc| field_matches(doc, collection, filter_field, filter_value))
        else {
            return Ok(false);
        };

        let Some(body) = doc.body.as_object_mut() else {
            return Err(RepositoryError::DataCorruption(format!(
                "document {} in {collection} is not a JSON object",
                doc.id
            )));
        };
        body.insert(field.to_string(), value);
        doc.updated_at = Utc::now();
        Ok(true)
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, RepositoryError> {
        let documents = self.documents.read().await;
        let mut names: Vec<String> = Collection::ALL
            .into_iter()
            .filter(|collection| documents.iter().any(|doc| doc.collection == *collection))
            .map(|collection| collection.name().to_string())
            .collect();
        names.sort();
        names.truncate(limit);
        Ok(names)
    }
}
