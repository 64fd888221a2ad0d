//! User account management.
//!
//! Registration, profile updates and account deletion. Passwords are hashed
//! before they reach the database, and a user may only change or remove their
//! own record.

use serde::Deserialize;

use crate::auth::models::AuthenticatedUser;
use crate::auth::service::AuthService;
use crate::database::models::{User, UserRecord};
use crate::database::{is_unique_violation, queries, Database};
use crate::errors::ApiError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Body for registration and full profile updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(ApiError::Validation("email is not valid".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub struct UserManager<'a> {
    db: &'a Database,
    auth: &'a AuthService,
}

impl<'a> UserManager<'a> {
    pub fn new(db: &'a Database, auth: &'a AuthService) -> Self {
        Self { db, auth }
    }

    async fn record_from(&self, input: &UserInput) -> Result<UserRecord, ApiError> {
        input.validate()?;
        Ok(UserRecord {
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            hashed_password: self.auth.hash_password(&input.password).await?,
        })
    }

    pub async fn register(&self, input: &UserInput) -> Result<User, ApiError> {
        let record = self.record_from(input).await?;
        let user = queries::insert_user(self.db.pool(), &record)
            .await
            .map_err(conflict_on_duplicate)?;
        tracing::info!(user_id = user.id, "registered user");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        queries::get_user(self.db.pool(), id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
    }

    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, ApiError> {
        Ok(queries::list_users(self.db.pool(), skip, limit).await?)
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        input: &UserInput,
    ) -> Result<User, ApiError> {
        ensure_self(actor, id)?;
        let record = self.record_from(input).await?;
        let user = queries::update_user(self.db.pool(), id, &record)
            .await
            .map_err(conflict_on_duplicate)?
            .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
        tracing::info!(user_id = id, "updated user");
        Ok(user)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: i64) -> Result<User, ApiError> {
        ensure_self(actor, id)?;
        let user = self.get(id).await?;
        queries::delete_user(self.db.pool(), id).await?;
        tracing::info!(user_id = id, "deleted user");
        Ok(user)
    }
}

fn ensure_self(actor: &AuthenticatedUser, id: i64) -> Result<(), ApiError> {
    if actor.id() != id {
        return Err(ApiError::Forbidden("you can only modify your own account".into()));
    }
    Ok(())
}

fn conflict_on_duplicate(err: sqlx::Error) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::Conflict("email already registered".into())
    } else {
        ApiError::Database(err)
    }
}
