//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::Persistence;
use crate::services::IntegrationService;
use crate::shopify::AdminApi;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no per-request data;
/// the persistence handle and the Admin API client are the only shared
/// resources.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    persistence: Persistence,
    integrations: IntegrationService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `persistence` - Backing store, or `Persistence::Absent`
    /// * `shopify` - Admin API client
    #[must_use]
    pub fn new(config: ApiConfig, persistence: Persistence, shopify: Arc<dyn AdminApi>) -> Self {
        let integrations = IntegrationService::new(persistence.clone(), shopify);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                persistence,
                integrations,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence handle.
    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.inner.persistence
    }

    /// Get a reference to the integration service.
    #[must_use]
    pub fn integrations(&self) -> &IntegrationService {
        &self.inner.integrations
    }
}
