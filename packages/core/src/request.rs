use axum::http::HeaderMap;

/// Inbound header carrying the caller-supplied request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Field name the identifier is attached under.
pub const REQUEST_ID_FIELD: &str = "request-id";

/// Read the request identifier from `headers`.
///
/// A missing header yields an empty string. Non-UTF-8 bytes are replaced
/// rather than dropped.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}
