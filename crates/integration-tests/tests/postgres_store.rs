//! Integration tests for the `PostgreSQL` document store.
//!
//! These tests require a running `PostgreSQL` database. The schema is
//! migrated on connect, and every test works on its own domain so runs do
//! not interfere.
//!
//! Run with: `TEST_DATABASE_URL=postgres://... cargo test -p shopsync-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::{Value, json};
use shopsync_api::db::{DocumentStore, PgDocumentStore, RepositoryError};
use shopsync_core::Collection;
use sqlx::PgPool;
use uuid::Uuid;

async fn store() -> PgDocumentStore {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must point at a disposable database");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate");
    PgDocumentStore::new(pool)
}

fn unique_domain() -> String {
    format!("test-{}.myshopify.com", Uuid::new_v4().simple())
}

// ============================================================================
// Reads & Writes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_insert_then_find_by_body_field() {
    let store = store().await;
    let domain = unique_domain();

    let id = store
        .insert(
            Collection::ShopifyIntegration,
            json!({ "domain": domain, "access_token": "shpat_1" }),
        )
        .await
        .unwrap();

    let doc = store
        .find_one(Collection::ShopifyIntegration, "domain", &domain)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.id, id);
    assert_eq!(doc.collection, Collection::ShopifyIntegration);
    assert_eq!(doc.body["access_token"], "shpat_1");
    assert_eq!(doc.created_at, doc.updated_at);

    let other_collection = store
        .find_one(Collection::DataSnapshot, "domain", &domain)
        .await
        .unwrap();
    assert!(other_collection.is_none());
}

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_replace_overwrites_body() {
    let store = store().await;
    let domain = unique_domain();
    let id = store
        .insert(
            Collection::ShopifyIntegration,
            json!({ "domain": domain, "access_token": "old", "store_name": "Acme" }),
        )
        .await
        .unwrap();

    let replaced = store
        .replace(
            Collection::ShopifyIntegration,
            id,
            json!({ "domain": domain, "access_token": "new", "store_name": null }),
        )
        .await
        .unwrap();
    assert!(replaced);

    let doc = store
        .find_one(Collection::ShopifyIntegration, "domain", &domain)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.body["access_token"], "new");
    assert_eq!(doc.body["store_name"], Value::Null);
    assert!(doc.updated_at >= doc.created_at);

    let missing = store
        .replace(
            Collection::ShopifyIntegration,
            shopsync_core::DocumentId::new(),
            json!({}),
        )
        .await
        .unwrap();
    assert!(!missing);
}

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_set_field_updates_one_key() {
    let store = store().await;
    let domain = unique_domain();
    store
        .insert(
            Collection::ShopifyIntegration,
            json!({ "domain": domain, "access_token": "t" }),
        )
        .await
        .unwrap();

    let updated = store
        .set_field(
            Collection::ShopifyIntegration,
            ("domain", &domain),
            "store_name",
            json!("Acme Goods"),
        )
        .await
        .unwrap();
    assert!(updated);

    let doc = store
        .find_one(Collection::ShopifyIntegration, "domain", &domain)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.body["store_name"], "Acme Goods");
    assert_eq!(doc.body["access_token"], "t");

    let unmatched = store
        .set_field(
            Collection::ShopifyIntegration,
            ("domain", &unique_domain()),
            "store_name",
            json!("Nobody"),
        )
        .await
        .unwrap();
    assert!(!unmatched);
}

// ============================================================================
// Constraints & Listing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_duplicate_domain_is_conflict() {
    let store = store().await;
    let domain = unique_domain();
    let body = json!({ "domain": domain, "access_token": "t" });
    store
        .insert(Collection::ShopifyIntegration, body.clone())
        .await
        .unwrap();

    let err = store
        .insert(Collection::ShopifyIntegration, body.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // Uniqueness is per collection.
    store.insert(Collection::DataSnapshot, body).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires running database"]
async fn test_list_collections_names_used_collections() {
    let store = store().await;
    let domain = unique_domain();
    store
        .insert(Collection::ShopifyIntegration, json!({ "domain": domain }))
        .await
        .unwrap();
    store
        .insert(Collection::DataSnapshot, json!({ "domain": domain, "data": {} }))
        .await
        .unwrap();

    let names = store.list_collections(10).await.unwrap();
    assert!(names.contains(&"shopifyintegration".to_string()));
    assert!(names.contains(&"datasnapshot".to_string()));

    let limited = store.list_collections(1).await.unwrap();
    assert_eq!(limited.len(), 1);
}
