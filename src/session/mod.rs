//! Session gate: where the bearer token lives between calls.
//!
//! Clients receive a [`SharedSession`] at construction and read the token on
//! every request, so a login or logout is visible to the very next call.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session state is poisoned by a panicked writer")]
    Poisoned,
}

pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: String) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

pub type SharedSession = Arc<dyn SessionStore>;

/// Token for an authenticated call, or an authentication failure.
pub fn require_session(session: &dyn SessionStore) -> ClientResult<String> {
    session
        .token()
        .ok_or_else(|| ClientError::authentication("No authentication token; please log in"))
}

/// Process-local session.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(self)
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: String) -> Result<(), SessionError> {
        *self.token.write().map_err(|_| SessionError::Poisoned)? = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub username: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

/// Session persisted as JSON so separate CLI invocations share one login.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
    username: Arc<RwLock<Option<String>>>,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            username: Arc::new(RwLock::new(None)),
        }
    }

    /// Session file inside the configured directory.
    pub fn from_config() -> anyhow::Result<Self> {
        let config = crate::config::config();
        let dir = config.config_dir()?;
        Ok(Self::new(dir.join(&config.session.token_file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Username recorded with the next `set_token`.
    pub fn remember_user(&self, username: impl Into<String>) {
        if let Ok(mut guard) = self.username.write() {
            *guard = Some(username.into());
        }
    }

    pub fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(self)
    }
}

impl SessionStore for FileSession {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(record) => record.map(|r| r.token),
            Err(err) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn set_token(&self, token: String) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let record = SessionRecord {
            token,
            username: self.username.read().ok().and_then(|guard| guard.clone()),
            logged_in_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
