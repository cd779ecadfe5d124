//! ShopSync Core - Shared types library.
//!
//! This crate provides common types used across all ShopSync components:
//! - `api` - HTTP backend that stores store credentials and serves summaries
//! - `cli` - Command-line tools for migrations and domain checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Store domains, document ids and collections, persisted models,
//!   and the summary payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
