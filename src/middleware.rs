use axum::{body::Body, http::Request};
use tracing::{info_span, Span};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Span keyed by the request id. Only the path is recorded so caller-supplied
/// query values never reach the logs.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

