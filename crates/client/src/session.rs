//! User session store
//!
//! The session holds the bearer token and the profile returned by the login
//! endpoint. It is shared by the client (which reads the token and clears it
//! on a forced logout) and the auth pages (which fill and clear it). When a
//! file is configured the session survives restarts.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use corpografo_core::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

// ============================================================================
// SessionState
// ============================================================================

/// Persisted session contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Bearer token attached to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Display name for the header greeting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Path requested before the login redirect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,

    /// Any other attribute of the login response
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// Shared, optionally persisted session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    path: Option<Arc<PathBuf>>,
}

impl SessionStore {
    /// A session that lives in memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A session persisted at `path`, loaded now if the file exists
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match load_state(&path) {
            Ok(Some(state)) => {
                debug!(path = %path.display(), "Loaded session");
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                SessionState::default()
            }
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            path: Some(Arc::new(path)),
        }
    }

    /// Persistent when a path is given, in memory otherwise
    pub fn open(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::persistent(path),
            None => Self::in_memory(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.read().access_token.clone().filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_logged_in()
    }

    /// Display name, falling back to the email
    pub fn display_name(&self) -> Option<String> {
        let state = self.read();
        state.name.clone().or_else(|| state.email.clone())
    }

    /// Store a successful login: the email plus every attribute of the body
    pub fn login(&self, email: &str, body: &Value) {
        {
            let mut state = self.write();
            let referrer = state.referrer.take();
            let mut next = match body {
                Value::Object(map) => {
                    serde_json::from_value::<SessionState>(Value::Object(map.clone()))
                        .unwrap_or_default()
                }
                _ => SessionState::default(),
            };
            next.email = Some(email.to_string());
            next.referrer = referrer;
            next.logged_in_at = Some(Utc::now());
            *state = next;
        }
        info!(email, "Session started");
        self.persist();
    }

    /// Forget everything, including the referrer
    pub fn clear(&self) {
        *self.write() = SessionState::default();
        info!("Session cleared");
        self.persist();
    }

    /// Remember the page requested before a login redirect
    pub fn set_referrer(&self, path: impl Into<String>) {
        self.write().referrer = Some(path.into());
        self.persist();
    }

    /// Take the remembered page, if any
    pub fn take_referrer(&self) -> Option<String> {
        let referrer = self.write().referrer.take();
        if referrer.is_some() {
            self.persist();
        }
        referrer
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let state = self.snapshot();
        if let Err(e) = save_state(path, &state) {
            warn!(path = %path.display(), error = %e, "Failed to persist session");
        }
    }
}

fn load_state(path: &Path) -> ConsoleResult<Option<SessionState>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConsoleError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(serde_json::from_str(&content)?))
}

fn save_state(path: &Path, state: &SessionState) -> ConsoleResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
