//! Core data types for pomoflow.
//!
//! This module defines the data structures used for:
//! - Timer mode and state management
//! - Timer configuration with validation
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// The three fixed timer configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Focused work session
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break
    LongBreak,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns the human-readable label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Work
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for the countdown timer.
///
/// Held in daemon memory only; never persisted. Changing it affects the
/// mode-to-duration mapping used by subsequent mode switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work duration in minutes (1-60)
    pub work_minutes: u32,
    /// Short break duration in minutes (1-30)
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// Whether to show a notification on expiry
    pub notifications: bool,
    /// Whether to ring the terminal bell on expiry
    pub sound: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            notifications: true,
            sound: true,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_minutes < 1 || self.work_minutes > 60 {
            return Err("work duration must be between 1 and 60 minutes".to_string());
        }
        if self.short_break_minutes < 1 || self.short_break_minutes > 30 {
            return Err("short break duration must be between 1 and 30 minutes".to_string());
        }
        if self.long_break_minutes < 1 || self.long_break_minutes > 60 {
            return Err("long break duration must be between 1 and 60 minutes".to_string());
        }
        Ok(())
    }

    /// Returns the duration in seconds for the given mode.
    pub fn duration_seconds(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_minutes * 60,
            TimerMode::ShortBreak => self.short_break_minutes * 60,
            TimerMode::LongBreak => self.long_break_minutes * 60,
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The countdown timer value object.
///
/// All operations are total: there are no error conditions, only no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Active mode
    pub mode: TimerMode,
    /// Remaining seconds in the current mode
    pub remaining_seconds: u32,
    /// Whether the countdown is advancing
    pub is_running: bool,
}

impl TimerState {
    /// Creates a new TimerState in work mode, full duration, not running.
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            mode: TimerMode::Work,
            remaining_seconds: config.duration_seconds(TimerMode::Work),
            is_running: false,
        }
    }

    /// Starts the countdown.
    ///
    /// No-op when the timer has expired (`remaining_seconds == 0`) or is
    /// already running. After a pause, resumes from the exact remaining value.
    pub fn start(&mut self) {
        if self.remaining_seconds > 0 {
            self.is_running = true;
        }
    }

    /// Pauses the countdown. Idempotent.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Switches to the given mode.
    ///
    /// Resets the remaining time to the mode's configured duration and stops
    /// the countdown. Allowed in every state; switching to the current mode
    /// resets it.
    pub fn switch_mode(&mut self, mode: TimerMode, config: &TimerConfig) {
        self.mode = mode;
        self.remaining_seconds = config.duration_seconds(mode);
        self.is_running = false;
    }

    /// Advances the countdown by one second, floored at zero.
    ///
    /// Returns true if the timer is expired after the tick.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Returns true if the remaining time has reached zero.
    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// Parameters for the configure command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureParams {
    /// Work duration in minutes
    #[serde(rename = "workMinutes", skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    /// Short break duration in minutes
    #[serde(rename = "shortBreakMinutes", skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<u32>,
    /// Long break duration in minutes
    #[serde(rename = "longBreakMinutes", skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    /// Expiry notification toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    /// Expiry sound toggle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<bool>,
}

impl ConfigureParams {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.work_minutes.is_none()
            && self.short_break_minutes.is_none()
            && self.long_break_minutes.is_none()
            && self.notifications.is_none()
            && self.sound.is_none()
    }
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Switch to a different mode, resetting the countdown
    Switch {
        /// Target mode
        mode: TimerMode,
    },
    /// Update the transient timer configuration
    Configure {
        /// Configuration fields to change
        #[serde(flatten)]
        params: ConfigureParams,
    },
    /// Query the current status
    Status,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Active mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Full duration of the active mode in seconds
    #[serde(rename = "durationSeconds", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Whether the countdown is advancing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

impl ResponseData {
    /// Creates response data from the timer state and configuration.
    pub fn from_timer_state(state: &TimerState, config: &TimerConfig) -> Self {
        Self {
            mode: Some(state.mode.as_str().to_string()),
            remaining_seconds: Some(state.remaining_seconds),
            duration_seconds: Some(config.duration_seconds(state.mode)),
            running: Some(state.is_running),
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
