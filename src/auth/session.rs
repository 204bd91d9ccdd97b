//! Signed-in session persistence
//!
//! A session is the `{id, token}` pair handed out at sign-in. The token is
//! opaque: 32 random bytes, hex encoded. Sessions persist to a single YAML
//! file inside the directory's `.mingle/` folder so that later commands can
//! act as the signed-in member.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::identity::RecordId;

/// Length of the raw session token in bytes.
const TOKEN_LENGTH: usize = 32;

/// A signed-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in member's record ID
    pub id: RecordId,

    /// Opaque session token
    pub token: String,

    /// When the session was issued
    pub created: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session for the given member
    pub fn issue(id: RecordId) -> Self {
        let mut raw = [0u8; TOKEN_LENGTH];
        rand::rng().fill(&mut raw[..]);
        Self {
            id,
            token: hex::encode(raw),
            created: Utc::now(),
        }
    }
}

/// Errors from session persistence
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse session file: {0}")]
    Malformed(String),
}

/// File-backed session persistence
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store over the given session file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a session, replacing any existing one
    pub fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let contents = serde_yml::to_string(session)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Load the persisted session, if any
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let session =
            serde_yml::from_str(&contents).map_err(|e| SessionError::Malformed(e.to_string()))?;
        Ok(Some(session))
    }

    /// Clear any persisted session
    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
