//! ShopSync API library.
//!
//! Stores Shopify store credentials and serves an aggregated, read-only
//! summary of each store's products, orders, and customers. Exposed as a
//! library so the integration tests can build the router directly.
//!
//! # Security
//!
//! Stored access tokens grant Admin API access to the store. They are kept
//! as `SecretString` in memory and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
