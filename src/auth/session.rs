//! Local session storage.
//!
//! The identity provider issues a bearer token on sign-in; it is kept in a
//! JSON file under the home directory so separate CLI invocations can attach
//! it to task API calls. Logout deletes the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Session file path, relative to the home directory
const SESSION_FILE: &str = ".pomoflow/session.json";

// ============================================================================
// Session
// ============================================================================

/// Stored credentials issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the task API
    pub access_token: String,
    /// Refresh token (unused; kept for forward compatibility)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as a Unix timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Email of the signed-in account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Session {
    /// Creates a session from a bare access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            email: None,
        }
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// File-backed session storage.
pub struct SessionStore {
    /// Path of the session file
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store at the default path (`~/.pomoflow/session.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(Self {
            path: home.join(SESSION_FILE),
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the session to disk.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {:?}", parent))?;
        }
        let json =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        Ok(())
    }

    /// Reads the stored session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {:?}", self.path))?;
        let session = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse session file: {:?}", self.path))?;
        Ok(Some(session))
    }

    /// Deletes the stored session.
    ///
    /// Returns true if a session file existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session file: {:?}", self.path))?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
