use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header::HeaderName, StatusCode},
    middleware::Next,
    response::Response,
};

use super::ApiState;
use crate::request::REQUEST_ID_HEADER;
use crate::severity::Severity;

/// Log one line per request and echo `X-Request-ID` back to the caller.
pub async fn log_requests(State(logger): State<ApiState>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let headers = request.headers().clone();

    let mut response = next.run(request).await;
    let status = response.status();

    logger
        .at(severity_for_status(status), Some(&headers))
        .field("method", &method)
        .str("path", path)
        .field("status", status.as_u16())
        .field("latency_ms", started.elapsed().as_millis())
        .msg("Request completed");

    if let Some(id) = headers.get(REQUEST_ID_HEADER) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), id.clone());
    }

    response
}

/// Server errors are errors, client errors are warnings, the rest is info.
pub fn severity_for_status(status: StatusCode) -> Severity {
    if status.is_server_error() {
        Severity::Error
    } else if status.is_client_error() {
        Severity::Warn
    } else {
        Severity::Info
    }
}
