// src/handlers/mod.rs

pub mod attempt;
pub mod auth;
pub mod authoring;
pub mod grading;
pub mod guard;
pub mod quizzes;
pub mod result;
pub mod submissions;
pub mod widget;

use std::fmt;

use crate::{error::AppError, routes::Route, session::SessionStore};

pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: Level::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: Level::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: Level::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: Level::Error, text: text.into() }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            Level::Info => "info",
            Level::Success => "ok",
            Level::Warning => "warn",
            Level::Error => "error",
        };
        write!(f, "[{}] {}", tag, self.text)
    }
}

/// Outcome of a page-level operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Page<T> {
    Ready(T),
    /// Recoverable failure. `back` is the navigation offered alongside the
    /// error panel; `None` means stay put and let the user retry.
    Failed { notice: Notice, back: Option<Route> },
    /// Leave the page entirely (expired session -> login).
    Redirect { to: Route, notice: Notice },
}

impl<T> Page<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Page::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Page<U> {
        match self {
            Page::Ready(value) => Page::Ready(f(value)),
            Page::Failed { notice, back } => Page::Failed { notice, back },
            Page::Redirect { to, notice } => Page::Redirect { to, notice },
        }
    }
}

/// Holds a submit-in-progress flag for the lifetime of a request.
/// The flag is reset on drop, so abandoning the submit future re-enables submitting.
pub(crate) struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    pub(crate) fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Clears the stored session and sends the user to the login screen.
pub fn expire_session<T>(session: &dyn SessionStore) -> Page<T> {
    if let Err(e) = session.clear() {
        tracing::error!("Failed to clear session after 401: {}", e);
    }
    Page::Redirect {
        to: Route::Login,
        notice: Notice::error(SESSION_EXPIRED),
    }
}

/// Maps an operation result onto a page outcome.
///
/// * `Unauthorized` always clears the session and redirects to login.
/// * Anything else becomes an error notice (server message or `fallback`).
pub fn settle<T>(
    result: Result<T, AppError>,
    session: &dyn SessionStore,
    fallback: &str,
    back: Option<Route>,
) -> Page<T> {
    match result {
        Ok(value) => Page::Ready(value),
        Err(AppError::Unauthorized) => expire_session(session),
        Err(err) => {
            tracing::warn!("{}: {}", fallback, err);
            Page::Failed {
                notice: Notice::error(err.user_message(fallback)),
                back,
            }
        }
    }
}
