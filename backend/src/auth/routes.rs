//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user registration and login. They are public and are
//! merged into the main Axum router.

use axum::routing::post;
use axum::Router;

use super::handlers::{login, register};
use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
