//! Custom error types specific to authentication failures.
//!
//! Token validation distinguishes every failure reason so it can be logged and
//! tested, while the request layer collapses all of them into a single
//! "unauthorized" response.

use thiserror::Error;

/// Why a bearer token was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token has no subject")]
    MissingSubject,
    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password or unknown account. The two are deliberately the same.
    #[error("invalid credentials")]
    InvalidCredential,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("user lookup failed: {0}")]
    Store(String),
}

impl AuthError {
    /// True for failures caused by what the client presented, as opposed to
    /// server-side faults.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::InvalidCredential | AuthError::Token(_))
    }
}
