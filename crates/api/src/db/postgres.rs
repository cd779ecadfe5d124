//! `PostgreSQL` document store.
//!
//! All collections share the `documents` table; the logical collection name
//! is a column and the document itself is a JSONB body. A partial unique
//! index on `(collection, body->>'domain')` keeps one document per domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shopsync_core::{Collection, DocumentId};
use sqlx::PgPool;

use super::{DocumentStore, RepositoryError, StoredDocument};

/// Internal row type for `PostgreSQL` queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: DocumentId,
    body: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> StoredDocument {
        StoredDocument {
            id: self.id,
            collection,
            body: self.body,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Document store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-index violations to [`RepositoryError::Conflict`].
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        _ => RepositoryError::Database(e),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        body: Value,
    ) -> Result<DocumentId, RepositoryError> {
        let id = DocumentId::new();

        sqlx::query(
            r"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(id)
        .bind(collection.name())
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND body ->> $2 = $3
            ORDER BY created_at
            LIMIT 1
            ",
        )
        .bind(collection.name())
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.into_document(collection)))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        body: Value,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE documents
            SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.name())
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: (&str, &str),
        field: &str,
        value: Value,
    ) -> Result<bool, RepositoryError> {
        let (filter_field, filter_value) = filter;

        let result = sqlx::query(
            r"
            UPDATE documents
            SET body = jsonb_set(body, ARRAY[$4::text], $5, true), updated_at = NOW()
            WHERE id = (
                SELECT id FROM documents
                WHERE collection = $1 AND body ->> $2 = $3
                ORDER BY created_at
                LIMIT 1
            )
            ",
        )
        .bind(collection.name())
        .bind(filter_field)
        .bind(filter_value)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let names = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT collection
            FROM documents
            ORDER BY collection
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
