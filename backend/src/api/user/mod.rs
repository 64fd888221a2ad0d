//! Module for user profile and management API endpoints.
//!
//! This module handles functionalities related to user information that is
//! distinct from the core authentication process, such as listing users,
//! reading the caller's own profile, and updating or deleting an account.

pub mod handlers;
pub mod routes;
