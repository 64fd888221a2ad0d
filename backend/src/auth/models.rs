//! Data structures for authentication-related entities.
//!
//! This module defines the token claims, the login payloads and
//! the request-scoped authenticated user used throughout the authentication
//! flow.

use serde::{Deserialize, Serialize};

use crate::database::models::User;

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's numeric id as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// The user bound to a validated token for the duration of one request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Render a user id as a token subject.
pub fn subject_for(user_id: i64) -> String {
    user_id.to_string()
}

/// Parse a token subject back into a user id.
pub fn user_id_from_subject(subject: &str) -> Option<i64> {
    subject.parse::<i64>().ok().filter(|id| *id > 0)
}
