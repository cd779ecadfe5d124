//! Core types for ShopSync.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the API server, the CLI, and the integration tests.

pub mod collection;
pub mod domain;
pub mod id;
pub mod integration;
pub mod summary;

pub use collection::Collection;
pub use domain::{MYSHOPIFY_SUFFIX, ShopDomain};
pub use id::DocumentId;
pub use integration::{DataSnapshot, ShopifyIntegration};
pub use summary::{Counts, Summary};
