use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::ApiState;

const MAX_NAME_LEN: usize = 64;

/// `GET /hello/:name`
pub async fn hello(
    State(logger): State<ApiState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    if name.chars().count() > MAX_NAME_LEN {
        logger
            .warn(Some(&headers))
            .field("length", name.chars().count())
            .msg("Rejected greeting: name too long");
        return (StatusCode::BAD_REQUEST, "name too long").into_response();
    }

    logger
        .info(Some(&headers))
        .str("name", name.clone())
        .msg("Greeting requested");

    format!("hello, {}", name).into_response()
}
