//! Handler functions for user profile and management API endpoints.
//!
//! Every handler here requires a valid bearer token; updates and deletions are
//! further restricted to the caller's own record.

use axum::extract::State;
use axum::Json;

use crate::api::Pagination;
use crate::auth::models::AuthenticatedUser;
use crate::database::models::User;
use crate::errors::ApiError;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::services::user_manager::{UserInput, UserManager};
use crate::state::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    QueryParams(page): QueryParams<Pagination>,
) -> Result<Json<Vec<User>>, ApiError> {
    let (skip, limit) = page.bounds()?;
    let users = UserManager::new(&state.db, &state.auth).list(skip, limit).await?;
    Ok(Json(users))
}

pub async fn me(user: AuthenticatedUser) -> Json<User> {
    Json(user.into_inner())
}

pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(UserManager::new(&state.db, &state.auth).get(id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<Json<User>, ApiError> {
    let updated = UserManager::new(&state.db, &state.auth)
        .update(&user, id, &input)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    PathParam(id): PathParam<i64>,
) -> Result<Json<User>, ApiError> {
    let deleted = UserManager::new(&state.db, &state.auth).delete(&user, id).await?;
    Ok(Json(deleted))
}
