//! Error types for the task API client.

// ============================================================================
// ApiError
// ============================================================================

/// Errors surfaced by the remote task API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The stored token was rejected (or missing)
    #[error("Not logged in. Run 'pomoflow login' first")]
    Unauthorized,

    /// No task with the given id exists
    #[error("Task not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("Task API error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or canonical reason
        message: String,
    },

    /// The request never completed
    #[error("Failed to reach the task API: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Failed to decode task API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
