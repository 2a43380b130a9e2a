//! Command definitions for the pomoflow CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::DEFAULT_API_URL;
use crate::auth::DEFAULT_AUTH_URL;
use crate::types::{ConfigureParams, TimerMode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomoflow - a Pomodoro technique productivity CLI
#[derive(Parser, Debug)]
#[command(
    name = "pomoflow",
    version,
    about = "Pomodoro timer with remote task sync",
    long_about = "Master your time with the Pomodoro Technique.\n\
                  A countdown timer daemon with work/break modes, a task list\n\
                  backed by a remote API, and a productivity dashboard.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (default: ~/.pomoflow/pomoflow.sock)
    #[arg(long, env = "POMOFLOW_SOCKET", global = true)]
    pub socket: Option<PathBuf>,

    /// Task API base URL
    #[arg(long, env = "POMOFLOW_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Identity provider base URL
    #[arg(long, env = "POMOFLOW_AUTH_URL", default_value = DEFAULT_AUTH_URL, global = true)]
    pub auth_url: String,

    /// Identity provider anon key (sent as the apikey header)
    #[arg(long, env = "POMOFLOW_AUTH_KEY", default_value = "", global = true, hide_default_value = true)]
    pub auth_key: String,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start (or resume) the countdown
    Start,

    /// Pause the countdown
    Pause,

    /// Switch timer mode, resetting the countdown
    Switch {
        /// Target mode
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Show current timer status
    Status,

    /// Update timer settings (held in daemon memory only)
    Settings(SettingsArgs),

    /// Manage the remote task list
    Task {
        /// Task operation
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Sign in with email and password
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Delete the stored session
    Logout,

    /// Show the productivity dashboard
    Stats,

    /// Run as daemon (background service)
    #[command(hide = true)]
    Daemon,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Mode Argument
// ============================================================================

/// Timer mode as a CLI value.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Focused work session
    Work,
    /// Short break
    ShortBreak,
    /// Long break
    LongBreak,
}

impl From<ModeArg> for TimerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Work => TimerMode::Work,
            ModeArg::ShortBreak => TimerMode::ShortBreak,
            ModeArg::LongBreak => TimerMode::LongBreak,
        }
    }
}

// ============================================================================
// Settings Command Arguments
// ============================================================================

/// Arguments for the settings command
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Pomodoro length in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub work: Option<u32>,

    /// Short break length in minutes (1-30)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub short_break: Option<u32>,

    /// Long break length in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub long_break: Option<u32>,

    /// Enable or disable the expiry notification
    #[arg(long)]
    pub notifications: Option<bool>,

    /// Enable or disable the expiry sound
    #[arg(long)]
    pub sound: Option<bool>,
}

impl SettingsArgs {
    /// Converts the parsed arguments into IPC configure parameters.
    pub fn to_params(&self) -> ConfigureParams {
        ConfigureParams {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            notifications: self.notifications,
            sound: self.sound,
        }
    }
}

// ============================================================================
// Task Subcommands
// ============================================================================

/// Task list operations
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommands {
    /// Add a task
    Add(TaskAddArgs),

    /// List all tasks
    List,

    /// Toggle a task's completion
    Done {
        /// Task id
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
}

/// Arguments for the task add command
#[derive(Args, Debug, Clone)]
pub struct TaskAddArgs {
    /// Task title
    #[arg(value_parser = validate_task_title)]
    pub title: String,

    /// Planned pomodoro count
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub pomodoros: u32,

    /// Tags as a JSON array (e.g. '["focus","deep-work"]')
    #[arg(long, default_value = "[]", value_parser = validate_tags)]
    pub tags: String,
}

// ============================================================================
// Auth Command Arguments
// ============================================================================

/// Arguments for the login command
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "POMOFLOW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the signup command
#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "POMOFLOW_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Full name for the profile
    #[arg(short, long)]
    pub name: Option<String>,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task title.
///
/// - Must not be empty
/// - Must not exceed 100 characters
fn validate_task_title(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("task title must not be empty".to_string());
    }
    if s.len() > 100 {
        return Err("task title must be at most 100 characters".to_string());
    }
    Ok(s.to_string())
}

/// Validates that the tags argument is a JSON array.
fn validate_tags(s: &str) -> Result<String, String> {
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(value) if value.is_array() => Ok(s.to_string()),
        Ok(_) => Err("tags must be a JSON array".to_string()),
        Err(e) => Err(format!("tags must be valid JSON: {}", e)),
    }
}

// ============================================================================
// Tests
// ============================================================================
