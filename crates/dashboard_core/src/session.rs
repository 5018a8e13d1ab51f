//! Admin login gate: a fixed credential pair checked locally and a persisted
//! boolean login flag. There is no session token and no expiry; anything that
//! can read the session file is trusted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_ADMIN_EMAIL.into(),
            password: DEFAULT_ADMIN_PASSWORD.into(),
        }
    }
}

impl AdminCredentials {
    pub fn from_env() -> Self {
        let mut credentials = Self::default();
        if let Ok(v) = std::env::var("ADMIN_EMAIL") {
            credentials.email = v;
        }
        if let Ok(v) = std::env::var("ADMIN_PASSWORD") {
            credentials.password = v;
        }
        credentials
    }

    /// Exact comparison of both fields; no trimming or case folding.
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionState {
    is_logged_in: bool,
}

/// File-backed login flag under the user data directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storefront-admin")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable state reads as logged out.
    pub fn is_logged_in(&self) -> bool {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return false;
        };
        match serde_json::from_str::<SessionState>(&raw) {
            Ok(state) => state.is_logged_in,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring corrupt session state"
                );
                false
            }
        }
    }

    pub fn set_logged_in(&self, is_logged_in: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(&SessionState { is_logged_in })?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session state '{}'", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session state '{}'", self.path.display())
            }),
        }
    }
}

pub struct LoginGate {
    credentials: AdminCredentials,
    session: SessionStore,
}

impl LoginGate {
    pub fn new(credentials: AdminCredentials, session: SessionStore) -> Self {
        Self {
            credentials,
            session,
        }
    }

    /// On a matching pair, persists the login flag and reports success. On
    /// any other pair nothing is written; the caller shows an inline alert.
    pub fn login(&self, email: &str, password: &str) -> Result<bool> {
        if !self.credentials.matches(email, password) {
            return Ok(false);
        }
        self.session.set_logged_in(true)?;
        Ok(true)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }
}
