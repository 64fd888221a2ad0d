//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the user and task API
//! domains, excluding core authentication routes which are handled
//! separately, plus the query types they share.

pub mod task;
pub mod user;

use axum::Router;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?skip=&limit=` query parameters.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Resolve to `(skip, limit)`, capping the page size.
    pub fn bounds(&self) -> Result<(i64, i64), ApiError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if skip < 0 {
            return Err(ApiError::Validation("skip must not be negative".into()));
        }
        if limit < 1 {
            return Err(ApiError::Validation("limit must be at least 1".into()));
        }
        Ok((skip, limit.min(MAX_PAGE_SIZE)))
    }
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(user::routes::user_router())
        .merge(task::routes::task_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_cap() {
        assert_eq!(Pagination::default().bounds().unwrap(), (0, 100));
        let page = Pagination { skip: Some(20), limit: Some(5000) };
        assert_eq!(page.bounds().unwrap(), (20, MAX_PAGE_SIZE));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(Pagination { skip: Some(-1), limit: None }.bounds().is_err());
        assert!(Pagination { skip: None, limit: Some(0) }.bounds().is_err());
    }
}
