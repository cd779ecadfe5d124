//! Integration tests for ShopSync.
//!
//! Each test drives the full router in-process with `tower::ServiceExt::oneshot`.
//! The Shopify Admin API is replaced by a `wiremock` server and the database
//! by [`MemoryDocumentStore`], so no external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopsync-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `connect` - `POST /shopify/connect`
//! - `summary` - `GET /shopify/summary`
//! - `diagnostics` - `/`, `/health`, and `/test`
//! - `middleware` - CORS and request ids
//! - `postgres_store` - `PgDocumentStore` against a live database (ignored
//!   unless `TEST_DATABASE_URL` is set and `--ignored` is passed)

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::Value;
use shopsync_api::config::ApiConfig;
use shopsync_api::db::{
    DocumentStore, MemoryDocumentStore, Persistence, RepositoryError, StoredDocument,
};
use shopsync_api::routes;
use shopsync_api::shopify::{API_VERSION, ShopifyClient};
use shopsync_api::state::AppState;
use shopsync_core::{Collection, DocumentId};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A router wired to a mock Shopify and, optionally, an in-memory store.
pub struct TestContext {
    /// Stands in for every shop's Admin API.
    pub shopify: MockServer,
    /// The backing store, `None` when running without a database.
    pub store: Option<Arc<MemoryDocumentStore>>,
    app: Router,
}

impl TestContext {
    /// Context with an empty in-memory database.
    pub async fn new() -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        Self::build(
            Persistence::Connected(store.clone()),
            Some(store),
            &[
                ("DATABASE_URL", "postgres://shopsync@localhost/shopsync"),
                ("DATABASE_NAME", "shopsync_test"),
            ],
        )
        .await
    }

    /// Context without any database configured.
    pub async fn without_database() -> Self {
        Self::build(Persistence::Absent, None, &[]).await
    }

    /// Context backed by `store`, which the caller keeps no handle to.
    pub async fn with_store(store: impl DocumentStore + 'static) -> Self {
        Self::build(
            Persistence::connected(store),
            None,
            &[("DATABASE_URL", "postgres://shopsync@localhost/shopsync")],
        )
        .await
    }

    async fn build(
        persistence: Persistence,
        store: Option<Arc<MemoryDocumentStore>>,
        vars: &[(&str, &str)],
    ) -> Self {
        let shopify = MockServer::start().await;
        let config = ApiConfig::from_lookup(|key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string())
        })
        .expect("test config is valid");
        let client = ShopifyClient::with_origin(shopify.uri()).expect("client builds");
        let state = AppState::new(config, persistence, Arc::new(client));

        Self {
            shopify,
            store,
            app: routes::app(state),
        }
    }

    /// Answer `GET admin/api/{version}/{resource}` with `status` and a JSON body.
    pub async fn mock_resource(&self, resource: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/admin/api/{API_VERSION}/{resource}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.shopify)
            .await;
    }

    /// Documents currently stored in `collection`.
    pub async fn documents(&self, collection: Collection) -> Vec<StoredDocument> {
        let store = self.store.as_ref().expect("context has an inspectable store");
        store.documents(collection).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }

    /// Send an arbitrary request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = match self.app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body is JSON")
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("body is UTF-8")
    }

    /// A header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Store whose snapshot writes always fail. Integrations behave normally.
#[derive(Debug, Default)]
pub struct SnapshotWritesFail {
    inner: MemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for SnapshotWritesFail {
    async fn insert(
        &self,
        collection: Collection,
        body: Value,
    ) -> Result<DocumentId, RepositoryError> {
        if collection == Collection::DataSnapshot {
            return Err(RepositoryError::Unavailable);
        }
        self.inner.insert(collection, body).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        self.inner.find_one(collection, field, value).await
    }

    async fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        body: Value,
    ) -> Result<bool, RepositoryError> {
        if collection == Collection::DataSnapshot {
            return Err(RepositoryError::Unavailable);
        }
        self.inner.replace(collection, id, body).await
    }

    async fn set_field(
        &self,
        collection: Collection,
        filter: (&str, &str),
        field: &str,
        value: Value,
    ) -> Result<bool, RepositoryError> {
        self.inner.set_field(collection, filter, field, value).await
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>, RepositoryError> {
        self.inner.list_collections(limit).await
    }
}
