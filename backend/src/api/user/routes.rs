//! Defines the HTTP routes for user management.

use axum::routing::get;
use axum::Router;

use super::handlers::{delete_user, get_user, list_users, me, update_user};
use crate::state::AppState;

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
}
