//! Request spans.
//!
//! Every request gets one span carrying the request ID and, once the
//! forwarding filter has run, the client-facing origin.

use axum::http::Request;
use tracing::Span;

use crate::forwarding::{ForwardedInfo, RequestUrl};
use crate::http::X_REQUEST_ID;

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let forwarded_for = request
        .extensions()
        .get::<ForwardedInfo>()
        .and_then(|info| info.forwarded_for.as_deref())
        .unwrap_or("-");
    let request_url = request
        .extensions()
        .get::<RequestUrl>()
        .map(RequestUrl::as_str)
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        forwarded_for = %forwarded_for,
        request_url = %request_url,
    )
}
