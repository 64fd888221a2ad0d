//! Handler functions for the task API.
//!
//! These functions extract the authenticated owner, hand the request to
//! `services::task_manager`, and format the responses.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::Pagination;
use crate::auth::models::AuthenticatedUser;
use crate::database::models::Task;
use crate::errors::ApiError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::services::task_manager::{TaskInput, TaskManager};
use crate::state::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let (skip, limit) = page.bounds()?;
    Ok(Json(TaskManager::for_user(&state.db, &user).list(skip, limit).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = TaskManager::for_user(&state.db, &user).create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(TaskManager::for_user(&state.db, &user).get(id).await?))
}

pub async fn list_children(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let (skip, limit) = page.bounds()?;
    let children = TaskManager::for_user(&state.db, &user)
        .children(id, skip, limit)
        .await?;
    Ok(Json(children))
}

pub async fn update_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    JsonBody(input): JsonBody<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(TaskManager::for_user(&state.db, &user).update(id, input).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(TaskManager::for_user(&state.db, &user).delete(id).await?))
}
