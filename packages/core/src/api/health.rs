//! Liveness endpoint. Also reports the logger's current minimum level so a
//! level change made at runtime can be checked from outside.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing_subscriber::filter::LevelFilter;

use super::ApiState;

/// Response header carrying the active minimum level, upper-case.
pub const LOG_LEVEL_HEADER: &str = "x-log-level";

pub async fn health(State(logger): State<ApiState>, headers: HeaderMap) -> impl IntoResponse {
    let level = logger
        .minimum_level()
        .unwrap_or(LevelFilter::DEBUG)
        .to_string()
        .to_uppercase();

    logger
        .debug(Some(&headers))
        .str("min_level", level.clone())
        .msg("Health check");

    (
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "no-store".to_string()),
            (header::HeaderName::from_static(LOG_LEVEL_HEADER), level),
        ],
        "ok",
    )
}
