//! Email/password authentication against the hosted identity provider.
//!
//! This module provides:
//! - `AuthClient`: sign-in (password grant) and sign-up calls
//! - `session`: local storage for the issued bearer token
//!
//! The provider is Supabase-compatible: the anon key travels in the `apikey`
//! header, sign-in is `POST /auth/v1/token?grant_type=password`, and sign-up
//! may return a user without a session when email confirmation is enabled.

use std::time::Duration;

use serde::Deserialize;

pub mod session;

pub use session::{Session, SessionStore};

// ============================================================================
// Constants
// ============================================================================

/// Default identity provider base URL (local Supabase stack)
pub const DEFAULT_AUTH_URL: &str = "http://localhost:54321";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// AuthError
// ============================================================================

/// Errors surfaced by the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the credentials or the sign-up
    #[error("Authentication failed: {0}")]
    Rejected(String),

    /// Authentication succeeded but the response carried no token
    #[error("Authentication succeeded but no session token was returned")]
    MissingToken,

    /// The request never completed
    #[error("Failed to reach the identity provider: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Failed to decode identity provider response: {0}")]
    Decode(String),
}

// ============================================================================
// SignUpOutcome
// ============================================================================

/// Result of a successful sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider issued a session immediately
    SignedIn(Session),
    /// Account created; email confirmation required before sign-in
    ConfirmationPending,
}

// ============================================================================
// Wire types
// ============================================================================

/// Session payload returned by the provider.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    user: Option<UserResponse>,
}

/// User payload embedded in auth responses.
#[derive(Debug, Deserialize)]
struct UserResponse {
    email: Option<String>,
}

/// Error payload returned by the provider.
///
/// The field name varies across provider versions.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorResponse {
    fn message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.error)
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

// ============================================================================
// AuthClient
// ============================================================================

/// HTTP client for the identity provider.
pub struct AuthClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// Provider base URL
    base_url: String,
    /// Anon/public API key, sent as the `apikey` header
    api_key: String,
}

impl AuthClient {
    /// Creates a new auth client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Signs in with email and password.
    ///
    /// On success the returned session carries the bearer token for the task
    /// API.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let payload = Self::check_response(response).await?;
        Self::session_from_payload(payload, email).ok_or(AuthError::MissingToken)
    }

    /// Creates an account with email, password, and an optional display name.
    ///
    /// When the provider requires email confirmation the response carries no
    /// session; that is reported as [`SignUpOutcome::ConfirmationPending`],
    /// not as an error.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SignUpOutcome, AuthError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let mut body = serde_json::json!({
            "email": email,
            "password": password,
        });
        if let Some(name) = full_name {
            body["data"] = serde_json::json!({ "full_name": name });
        }

        let response = self
            .request(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let payload = Self::check_response(response).await?;
        Ok(match Self::session_from_payload(payload, email) {
            Some(session) => SignUpOutcome::SignedIn(session),
            None => SignUpOutcome::ConfirmationPending,
        })
    }

    /// Builds a request with the provider headers.
    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(url);
        if !self.api_key.is_empty() {
            builder = builder.header("apikey", &self.api_key);
        }
        builder
    }

    /// Maps provider error bodies; decodes the session payload on success.
    async fn check_response(response: reqwest::Response) -> Result<SessionResponse, AuthError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.message(),
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(AuthError::Rejected(message));
        }
        response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    /// Builds a session from the response payload, if it carries a token.
    fn session_from_payload(payload: SessionResponse, email: &str) -> Option<Session> {
        let access_token = payload.access_token?;
        let email = payload
            .user
            .and_then(|u| u.email)
            .unwrap_or_else(|| email.to_string());
        Some(Session {
            access_token,
            refresh_token: payload.refresh_token,
            expires_at: payload.expires_at,
            email: Some(email),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
