//! Dashboard statistics.
//!
//! The dashboard currently renders placeholder data; there is no aggregation
//! backend to query yet. The values here mirror the mock data the dashboard
//! shipped with.

// ============================================================================
// SessionSummary
// ============================================================================

/// One row of the recent-sessions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Number of completed sessions that day
    pub sessions: u32,
    /// Total focus duration, preformatted
    pub duration: String,
}

// ============================================================================
// DashboardStats
// ============================================================================

/// Aggregate productivity statistics for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Total focus time, preformatted
    pub total_focus_time: String,
    /// Number of completed pomodoro sessions
    pub sessions_completed: u32,
    /// Current daily streak, preformatted
    pub current_streak: String,
    /// Number of completed tasks
    pub tasks_completed: u32,
    /// Most recent days, newest first
    pub recent_sessions: Vec<SessionSummary>,
}

impl DashboardStats {
    /// Returns the placeholder dashboard data.
    pub fn placeholder() -> Self {
        Self {
            total_focus_time: "12h 30m".to_string(),
            sessions_completed: 48,
            current_streak: "7 days".to_string(),
            tasks_completed: 124,
            recent_sessions: vec![
                SessionSummary {
                    date: "2025-01-15".to_string(),
                    sessions: 6,
                    duration: "2h 30m".to_string(),
                },
                SessionSummary {
                    date: "2025-01-14".to_string(),
                    sessions: 8,
                    duration: "3h 20m".to_string(),
                },
                SessionSummary {
                    date: "2025-01-13".to_string(),
                    sessions: 5,
                    duration: "2h 5m".to_string(),
                },
                SessionSummary {
                    date: "2025-01-12".to_string(),
                    sessions: 7,
                    duration: "2h 55m".to_string(),
                },
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
