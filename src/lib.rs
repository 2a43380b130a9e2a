//! Pomoflow Library
//!
//! This library provides the core functionality for the pomoflow CLI.
//! It includes:
//! - Countdown timer engine with work/break modes
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state
//! - Expiry notification hook
//! - Remote task API client (bearer-token CRUD)
//! - Email/password authentication with local session storage
//! - Dashboard statistics (placeholder data)

pub mod api;
pub mod auth;
pub mod cli;
pub mod daemon;
pub mod notify;
pub mod stats;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ConfigureParams, IpcRequest, IpcResponse, ResponseData, TimerConfig, TimerMode, TimerState,
};

// Re-export daemon types
pub use daemon::{StartOutcome, TimerEngine, TimerEvent};

// Re-export notification types
pub use notify::{ConsoleNotifier, MockNotifier, Notifier, NotifyError};

// Re-export task API types
pub use api::{ApiError, NewTask, Task, TasksClient};

// Re-export auth types
pub use auth::{AuthClient, AuthError, Session, SessionStore, SignUpOutcome};

// Re-export stats types
pub use stats::{DashboardStats, SessionSummary};
