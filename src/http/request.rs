//! Request identification.
//!
//! Every request gets an `x-request-id` (UUID v4) unless the client sent
//! one. The id is recorded on the request span and echoed on the response.

use axum::{
    body::Body,
    http::{HeaderMap, Request},
};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// The request id header value, if present and printable.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// Span for `TraceLayer`, carrying the request id.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()).unwrap_or("unknown"),
    )
}
