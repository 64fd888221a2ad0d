//! Request extractors whose rejections render as [`ApiError`] bodies.
//!
//! axum's own `Json`, `Path` and `Query` answer bad input with plain-text
//! responses that echo deserializer output. These wrappers route the same
//! failures through `ApiError::Validation` instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Typed path segment(s).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

/// Typed query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
