//! Demo HTTP surface: every route logs through the shared [`Logger`].

pub mod greet;
pub mod health;
pub mod middleware;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::logger::Logger;

/// Shared state for all routes.
pub type ApiState = Logger;

/// Create the demo router with request logging applied to every route.
pub fn create_router(logger: ApiState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/hello/:name", get(greet::hello))
        .layer(from_fn_with_state(logger.clone(), middleware::log_requests))
        .with_state(logger)
}
