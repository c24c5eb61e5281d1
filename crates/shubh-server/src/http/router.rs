//! Router configuration for the HTTP API.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/chowgadhiya", get(handlers::chowgadhiya))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
