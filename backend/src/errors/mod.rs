//! Global application error types and handlers.
//!
//! This module defines the error type returned by every handler and maps it to
//! an HTTP status plus a stable machine-readable code. Authentication failures
//! of any kind surface as the same generic 401.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::errors::AuthError;

pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

const UNAUTHORIZED_MESSAGE: &str = "could not validate credentials";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

/// Error response for API endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => error_code::VALIDATION_FAILED,
            ApiError::Unauthorized => error_code::UNAUTHENTICATED,
            ApiError::Forbidden(_) => error_code::PERMISSION_DENIED,
            ApiError::NotFound(_) => error_code::NOT_FOUND,
            ApiError::Conflict(_) => error_code::ALREADY_EXISTS,
            ApiError::Database(_) => error_code::STORAGE_ERROR,
            ApiError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client. Server-side faults are logged
    /// but not described.
    fn public_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_rejection() {
            tracing::debug!(reason = %err, "authentication rejected");
            return ApiError::Unauthorized;
        }
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "expected a JSON request body",
            JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "request body is missing fields or has fields of the wrong type",
            _ => "could not read request body",
        };
        ApiError::Validation(message.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected path parameters");
        ApiError::Validation("invalid path parameter".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected query string");
        ApiError::Validation("invalid query string".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
        };
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::TokenError;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn every_auth_rejection_collapses_to_unauthorized() {
        let rejections = [
            AuthError::InvalidCredential,
            AuthError::Token(TokenError::InvalidSignature),
            AuthError::Token(TokenError::Malformed),
            AuthError::Token(TokenError::MissingSubject),
            AuthError::Token(TokenError::Expired),
        ];
        for err in rejections {
            let api: ApiError = err.into();
            assert!(matches!(api, ApiError::Unauthorized));
            assert_eq!(api.to_string(), UNAUTHORIZED_MESSAGE);
        }
    }

    #[test]
    fn auth_faults_are_internal() {
        let api: ApiError = AuthError::Hashing("rng".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn server_errors_hide_details() {
        let err = ApiError::Internal("secret stack trace".into());
        assert_eq!(err.public_message(), "internal server error");
        assert_eq!(ApiError::NotFound("task 3 not found".into()).public_message(), "task 3 not found");
    }

    #[test]
    fn body_rejections_are_validation_errors() {
        let syntax = axum::Json::<serde_json::Value>::from_bytes(b"not json").unwrap_err();
        let api: ApiError = syntax.into();
        assert!(matches!(&api, ApiError::Validation(m) if m == "request body is not valid JSON"));

        let shape = axum::Json::<std::collections::HashMap<String, i64>>::from_bytes(br#"{"a":"x"}"#)
            .unwrap_err();
        let api: ApiError = shape.into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
        assert!(!api.public_message().contains("invalid type"));
    }

    #[test]
    fn unauthorized_response_advertises_bearer() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[axum::http::header::WWW_AUTHENTICATE], "Bearer");
    }
}
