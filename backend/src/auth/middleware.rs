//! Middleware for protecting authenticated routes.
//!
//! Handlers that take an [`AuthenticatedUser`] argument only run when the
//! request carries a valid `Authorization: Bearer <token>` header whose
//! subject still resolves to a user.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;

use super::models::AuthenticatedUser;
use crate::errors::ApiError;
use crate::state::AppState;

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::debug!("missing bearer token");
            ApiError::Unauthorized
        })?;
        let user = state.auth.authenticate(token, Utc::now()).await?;
        Ok(user)
    }
}

/// Extract the token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
