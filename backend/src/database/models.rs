//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models:
//! the stored password hash is never serialized into a response.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created: DateTime<Utc>,
    pub edited: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub parent_id: Option<i64>,
    pub owner_id: i64,
    pub created: DateTime<Utc>,
    pub edited: DateTime<Utc>,
}

/// Column values for a user row; `hashed_password` is already hashed.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub hashed_password: String,
}

/// Column values for a task row, owner excluded.
#[derive(Debug, Clone, Default)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub done: bool,
    pub parent_id: Option<i64>,
}
