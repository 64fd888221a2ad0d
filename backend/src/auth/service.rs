//! Core business logic for the authentication system.
//!
//! This service ties the credential manager and the token service to the user
//! store: it hashes passwords off the async runtime, turns a successful login
//! into a bearer token, and resolves a presented token back to a user.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::{AuthError, TokenError};
use super::models::{subject_for, user_id_from_subject, AuthenticatedUser, TokenResponse};
use super::password::CredentialManager;
use super::token::TokenService;
use crate::config::Config;
use crate::database::models::User;

/// Lookups the authentication flow needs from persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error>;
}

pub struct AuthService {
    credentials: CredentialManager,
    tokens: TokenService,
    users: Arc<dyn UserStore>,
    // Verified against when the email is unknown, so both failure paths cost
    // the same.
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        credentials: CredentialManager,
        tokens: TokenService,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, AuthError> {
        let decoy_hash = credentials.hash("decoy-password-never-matches")?;
        Ok(Self {
            credentials,
            tokens,
            users,
            decoy_hash,
        })
    }

    pub fn from_config(config: &Config, users: Arc<dyn UserStore>) -> Result<Self, AuthError> {
        Self::new(
            CredentialManager::new(config.hash_cost)?,
            TokenService::new(&config.jwt),
            users,
        )
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Hash a password on the blocking pool.
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        let credentials = self.credentials.clone();
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || credentials.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Verify a password on the blocking pool. A panicked worker is a mismatch.
    pub async fn verify_password(&self, plaintext: &str, hash: &str) -> bool {
        let credentials = self.credentials.clone();
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || credentials.verify(&plaintext, &hash))
            .await
            .unwrap_or(false)
    }

    /// Check an email/password pair and issue a token for the matching user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenResponse, AuthError> {
        let user = self.users.find_by_email(email).await.map_err(store_error)?;

        let hash = user
            .as_ref()
            .map(|u| u.hashed_password.as_str())
            .unwrap_or(self.decoy_hash.as_str());
        let matches = self.verify_password(password, hash).await;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                tracing::debug!("login rejected");
                return Err(AuthError::InvalidCredential);
            }
        };

        let ttl = self.tokens.default_ttl();
        let token = self.tokens.issue(&subject_for(user.id), now, ttl)?;
        tracing::info!(user_id = user.id, "issued access token");
        Ok(TokenResponse::bearer(token, ttl.num_seconds()))
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let subject = self.tokens.validate(token, now)?;
        // A well-signed token whose subject is not one of our ids carries no
        // usable identity.
        let user_id = user_id_from_subject(&subject).ok_or(TokenError::MissingSubject)?;
        match self.users.find_by_id(user_id).await.map_err(store_error)? {
            Some(user) => Ok(AuthenticatedUser(user)),
            None => {
                tracing::debug!(user_id, "token subject no longer exists");
                Err(AuthError::InvalidCredential)
            }
        }
    }
}

fn store_error(err: sqlx::Error) -> AuthError {
    AuthError::Store(err.to_string())
}
