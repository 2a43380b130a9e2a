//! Display utilities for the pomoflow CLI.
//!
//! This module provides formatted output for:
//! - Timer command results and status
//! - Task list rendering
//! - Auth results
//! - The stats dashboard
//! - Error messages

use crate::api::Task;
use crate::auth::Session;
use crate::stats::DashboardStats;
use crate::types::IpcResponse;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the result of a start command.
    pub fn show_start_success(response: &IpcResponse) {
        println!("* {}", response.message);
        Self::show_remaining(response);
    }

    /// Shows the result of a pause command.
    pub fn show_pause_success(response: &IpcResponse) {
        println!("|| {}", response.message);
        Self::show_remaining(response);
    }

    /// Shows the result of a switch command.
    pub fn show_switch_success(response: &IpcResponse) {
        println!("> {}", response.message);
        Self::show_remaining(response);
    }

    /// Shows the result of a settings command.
    pub fn show_settings_success(response: &IpcResponse) {
        println!("* {}", response.message);
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("Pomodoro Timer Status");
        println!("─────────────────────────────");

        let Some(data) = &response.data else {
            println!("The timer is not available");
            return;
        };

        let mode = data.mode.as_deref().unwrap_or("unknown");
        let mode_display = match mode {
            "work" => "Pomodoro",
            "short_break" => "Short Break",
            "long_break" => "Long Break",
            _ => mode,
        };
        println!("Mode: {}", mode_display);

        if let Some(remaining) = data.remaining_seconds {
            let (minutes, seconds) = Self::format_time(remaining);
            match data.duration_seconds {
                Some(duration) => {
                    let (total_minutes, total_seconds) = Self::format_time(duration);
                    println!(
                        "Remaining: {}:{:02} / {}:{:02}",
                        minutes, seconds, total_minutes, total_seconds
                    );
                }
                None => println!("Remaining: {}:{:02}", minutes, seconds),
            }

            let state = if remaining == 0 {
                "expired"
            } else if data.running == Some(true) {
                "running"
            } else if data.remaining_seconds == data.duration_seconds {
                "idle"
            } else {
                "paused"
            };
            println!("State: {}", state);
        }
    }

    /// Shows the task list.
    pub fn show_tasks(tasks: &[Task]) {
        println!("Tasks");
        println!("─────────────────────────────");

        if tasks.is_empty() {
            println!("No tasks yet. Add one!");
            return;
        }

        for task in tasks {
            let marker = if task.is_complete { "[x]" } else { "[ ]" };
            println!(
                "{} {}  ({}/{} pomodoros)",
                marker, task.title, task.completed_pomodoros, task.target_pomodoros
            );
            println!("    id: {}", task.id);
        }
    }

    /// Shows a newly created task.
    pub fn show_task_added(task: &Task) {
        println!("* Task added: {}", task.title);
        println!("  id: {}", task.id);
    }

    /// Shows a task after its completion flag was toggled.
    pub fn show_task_toggled(task: &Task) {
        if task.is_complete {
            println!("* Task completed: {}", task.title);
        } else {
            println!("* Task reopened: {}", task.title);
        }
    }

    /// Shows a task deletion.
    pub fn show_task_deleted(id: &str) {
        println!("* Task deleted: {}", id);
    }

    /// Shows a successful sign-in.
    pub fn show_login_success(session: &Session) {
        println!("* Signed in");
        if let Some(email) = &session.email {
            println!("  Account: {}", email);
        }
    }

    /// Shows a sign-up that issued a session immediately.
    pub fn show_signup_success(session: &Session) {
        println!("* Account created");
        if let Some(email) = &session.email {
            println!("  Account: {}", email);
        }
    }

    /// Shows a sign-up that requires email confirmation.
    pub fn show_signup_pending() {
        println!("* Account created");
        println!("  Check your email for a confirmation link, then run 'pomoflow login'");
    }

    /// Shows the result of a logout.
    pub fn show_logout(existed: bool) {
        if existed {
            println!("* Signed out");
        } else {
            println!("No stored session");
        }
    }

    /// Shows the stats dashboard.
    pub fn show_stats(stats: &DashboardStats) {
        println!("Dashboard");
        println!("─────────────────────────────");
        println!("Total Focus Time:   {}", stats.total_focus_time);
        println!("Sessions Completed: {}", stats.sessions_completed);
        println!("Current Streak:     {}", stats.current_streak);
        println!("Tasks Completed:    {}", stats.tasks_completed);
        println!();
        println!("Recent Sessions");
        println!("{:<12} {:>8}  {}", "Date", "Sessions", "Duration");
        for session in &stats.recent_sessions {
            println!(
                "{:<12} {:>8}  {}",
                session.date, session.sessions, session.duration
            );
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Prints the remaining time line from response data, if present.
    fn show_remaining(response: &IpcResponse) {
        if let Some(data) = &response.data {
            if let Some(remaining) = data.remaining_seconds {
                let (minutes, seconds) = Self::format_time(remaining);
                println!("  Remaining: {}:{:02}", minutes, seconds);
            }
        }
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
