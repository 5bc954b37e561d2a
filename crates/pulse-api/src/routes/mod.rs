//! Route definitions
//!
//! Routes are mounted at the root to match the wire contract the browser
//! client speaks.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, typing};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new().merge(typing_routes()).merge(health_routes())
}

/// Typing signal routes
fn typing_routes() -> Router<AppState> {
    Router::new()
        .route("/typing-status", post(typing::post_typing_status))
        .route("/typing-status", get(typing::get_typing_status))
}

/// Health check routes
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
