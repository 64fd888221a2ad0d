//! Authentication module for managing user credentials and access tokens.
//!
//! This module provides the public interface for password hashing, bearer
//! token issuance and validation, the login/registration endpoints, and the
//! extractor that guards authenticated routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod token;

// Re-exports for convenience
pub use errors::{AuthError, TokenError};
pub use models::{AuthenticatedUser, Claims};
pub use password::CredentialManager;
pub use routes::auth_router;
pub use service::{AuthService, UserStore};
pub use token::TokenService;
