//! HTTP middleware.
//!
//! - [`request_id`] - request id generation and propagation
//! - [`cors`] - cross-origin policy

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
