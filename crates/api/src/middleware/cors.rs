//! Cross-origin policy.
//!
//! Every origin, method, and request header is allowed, with credentials.
//! Browsers reject a literal `*` alongside credentials, so the origin,
//! method, and headers of each request are mirrored back instead.

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build the permissive CORS layer.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
