//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between the API handlers and the database,
//! such as managing user accounts or a user's task tree.

pub mod task_manager;
pub mod user_manager;
