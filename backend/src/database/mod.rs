//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the SQLite connection pool,
//! creating the schema, and exposing the pool to the query layer. Connections
//! are checked out per query and returned to the pool on drop.

pub mod models;
pub mod queries;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::auth::service::UserStore;
use models::User;

// AUTOINCREMENT keeps user ids from ever being reused, which token subjects
// rely on.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        name            TEXT NOT NULL,
        email           TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        created         TEXT NOT NULL,
        edited          TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        done        INTEGER NOT NULL DEFAULT 0,
        parent_id   INTEGER REFERENCES tasks(id) ON DELETE CASCADE,
        owner_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created     TEXT NOT NULL,
        edited      TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_id)",
];

/// Handle to the application database.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `url` and make sure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory database. Used by tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // Every connection to `:memory:` is a separate database, so pin to one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        tracing::debug!("database schema ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        queries::get_user_by_email(&self.pool, email).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        queries::get_user(&self.pool, id).await
    }
}

/// True if `err` is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True if `err` is a FOREIGN KEY constraint violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
