//! `x-request-id` propagation.
//!
//! A caller-supplied id is kept when it is short visible ASCII, so ids minted
//! by a proxy or by the dashboard survive end to end. Anything else is
//! replaced with a fresh UUID v4. The id is tagged on the `http_request` span
//! and the Sentry scope, and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is kept.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Pick the id for this request: the caller's, if acceptable, else a new one.
fn resolve_request_id(incoming: Option<&HeaderValue>) -> HeaderValue {
    incoming
        .filter(|value| {
            let bytes = value.as_bytes();
            !bytes.is_empty()
                && bytes.len() <= MAX_REQUEST_ID_LEN
                && bytes.iter().all(u8::is_ascii_graphic)
        })
        .cloned()
        .unwrap_or_else(|| {
            let mut buf = Uuid::encode_buffer();
            HeaderValue::from_str(Uuid::new_v4().hyphenated().encode_lower(&mut buf))
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Attach a request id to the span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id = resolve_request_id(request.headers().get(&header));

    if let Ok(id) = request_id.to_str() {
        Span::current().record("request_id", id);
        sentry::configure_scope(|scope| scope.set_tag("request_id", id));
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(header, request_id);
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { StatusCode::OK }))
            .layer(axum::middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app()
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_rejects_unusable_incoming_ids() {
        let too_long = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1)).unwrap();
        let with_space = HeaderValue::from_static("edge 1234");
        let empty = HeaderValue::from_static("");

        for value in [too_long, with_space, empty] {
            let resolved = resolve_request_id(Some(&value));
            assert!(Uuid::parse_str(resolved.to_str().unwrap()).is_ok());
        }
    }

    #[test]
    fn test_keeps_longest_acceptable_id() {
        let value = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN)).unwrap();
        assert_eq!(resolve_request_id(Some(&value)), value);
    }

    #[tokio::test]
    async fn test_reuses_incoming_request_id() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "edge-1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-1234");
    }
}
