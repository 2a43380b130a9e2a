//! Remote task-storage API client.
//!
//! This module provides:
//! - `tasks`: models and pass-through CRUD client for the task API
//! - `error`: the task API error taxonomy

pub mod error;
pub mod tasks;

pub use error::ApiError;
pub use tasks::{NewTask, Task, TasksClient, DEFAULT_API_URL};
