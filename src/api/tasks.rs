//! Client for the remote task-storage API.
//!
//! The task list is pass-through CRUD: every operation is a single HTTP call
//! and the server owns all task state. Requests carry the session's bearer
//! token; updates send the entire task object (the server expects all fields
//! on PUT, not a partial).

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default task API base URL
pub const DEFAULT_API_URL: &str = "https://localhost:5001/api";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Task
// ============================================================================

/// A task as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned id (GUID)
    pub id: String,
    /// Task title
    pub title: String,
    /// Completion flag
    pub is_complete: bool,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Planned pomodoro count
    pub target_pomodoros: u32,
    /// Completed pomodoro count
    pub completed_pomodoros: u32,
    /// Creation timestamp (server formatted)
    pub created_at: String,
    /// Tags as a JSON-encoded array (stored as jsonb server-side)
    pub tags: String,
    /// Sort order
    pub order: i64,
    /// Optional due date
    #[serde(default)]
    pub due_date: Option<String>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
}

// ============================================================================
// NewTask
// ============================================================================

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title
    pub title: String,
    /// Planned pomodoro count
    pub target_pomodoros: u32,
    /// Tags as a JSON-encoded array
    pub tags: String,
}

impl NewTask {
    /// Creates a new task payload with default pomodoro target and no tags.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            target_pomodoros: 1,
            tags: "[]".to_string(),
        }
    }

    /// Sets the planned pomodoro count.
    pub fn with_target_pomodoros(mut self, target: u32) -> Self {
        self.target_pomodoros = target;
        self
    }

    /// Sets the tags (JSON-encoded array).
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

// ============================================================================
// TasksClient
// ============================================================================

/// HTTP client for the task API.
pub struct TasksClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// API base URL (e.g. `https://localhost:5001/api`)
    base_url: String,
    /// Bearer token from the stored session
    access_token: String,
}

impl TasksClient {
    /// Creates a new task API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches all tasks.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .request(Method::GET, &format!("{}/tasks", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Creates a task and returns the stored version.
    pub async fn create(&self, new_task: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .request(Method::POST, &format!("{}/tasks", self.base_url))
            .json(new_task)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Updates a task, sending the entire object.
    pub async fn update(&self, id: &str, task: &Task) -> Result<Task, ApiError> {
        let response = self
            .request(Method::PUT, &format!("{}/tasks/{}", self.base_url, id))
            .json(task)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Deletes a task.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("{}/tasks/{}", self.base_url, id))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Flips a task's completion flag.
    ///
    /// Read-modify-write: fetches the task, toggles `is_complete`, and PUTs
    /// the full object back.
    pub async fn toggle_complete(&self, id: &str) -> Result<Task, ApiError> {
        let tasks = self.list().await?;
        let mut task = tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        task.is_complete = !task.is_complete;
        self.update(id, &task).await
    }

    /// Builds a request with auth and correlation headers.
    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
            .header("X-Request-Id", Uuid::new_v4().to_string())
    }

    /// Maps non-success statuses to the error taxonomy.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
