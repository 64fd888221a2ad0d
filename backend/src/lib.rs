//! Library crate for the to-do backend.
//!
//! Users register and log in to receive a bearer token, then manage a tree of
//! tasks they own. The router built by [`app`] is what the binary serves and
//! what the integration tests drive.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(auth::auth_router())
        .merge(api::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(middleware::request_id))
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Welcome to the to-do backend!"
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
