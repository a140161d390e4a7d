// src/session.rs

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Admin sign-in only carries the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub access_token: String,
}

/// Student sign-in keeps the profile bits shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSession {
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub access_token: String,
}

/// The signed-in identity used to authorize API calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Admin(AdminSession),
    Student(StudentSession),
}

impl Session {
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Admin(s) => Some(&s.access_token),
            Session::Student(s) => Some(&s.access_token),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin(_))
    }
}

/// Where the current session lives between calls.
/// Injected into the HTTP client so token lookup is explicit.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Session, AppError>;
    fn save(&self, session: &Session) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// Keeps the session in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session, AppError> {
        // A poisoned lock still holds a usable session value.
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.save(&Session::Anonymous)
    }
}

/// Persists the session as JSON so the CLI stays signed in across runs.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::Anonymous),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::error!("Failed to parse stored session {:?}: {}", self.path, e);
                Ok(Session::Anonymous)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
