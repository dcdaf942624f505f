//! Callshelf server library.
//!
//! This crate provides the server functionality as a library, allowing it
//! to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod sync;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
///
/// CORS is wide open: the API is called from the storefront's browser
/// origin and carries no cookies or secrets of its own.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service banner.
async fn root() -> &'static str {
    "callshelf is running"
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify
/// connectivity.
async fn health() -> &'static str {
    "ok"
}
