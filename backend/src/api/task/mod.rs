//! Module for the task API.
//!
//! Tasks form a per-user tree; these endpoints expose CRUD over the caller's
//! own tasks and navigation of their children.

pub mod handlers;
pub mod routes;
