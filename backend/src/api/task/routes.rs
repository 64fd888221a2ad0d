//! Defines the HTTP routes for the task API.

use axum::routing::get;
use axum::Router;

use super::handlers::{create_task, delete_task, get_task, list_children, list_tasks, update_task};
use crate::state::AppState;

pub fn task_router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/tasks/:id/children", get(list_children))
}
