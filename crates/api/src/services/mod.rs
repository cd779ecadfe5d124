//! Business logic services.
//!
//! - [`integration`] - connect a store and build its summary
//! - [`diagnostics`] - health report for the `/test` endpoint

pub mod diagnostics;
pub mod integration;

use thiserror::Error;

pub use diagnostics::HealthReport;
pub use integration::{ConnectOutcome, IntegrationService};

/// Errors surfaced to callers of the services.
///
/// Everything else (upstream failures, missing persistence) is recovered
/// inside the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No integration is stored for the requested domain.
    #[error("Integration not found. Connect your store first.")]
    NotFound,
}
