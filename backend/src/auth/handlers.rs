//! Handler functions for authentication-related API endpoints.
//!
//! These functions process registration and login requests, normalize input,
//! and delegate to the user manager and `auth::service` for the actual work.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use super::models::{LoginRequest, TokenResponse};
use crate::database::models::User;
use crate::errors::ApiError;
use crate::extract::JsonBody;
use crate::services::user_manager::{normalize_email, UserInput, UserManager};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = UserManager::new(&state.db, &state.auth).register(&input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&body.email);
    let response = state.auth.login(&email, &body.password, Utc::now()).await?;
    Ok(Json(response))
}
