// src/error.rs

use thiserror::Error;

/// Global Application Error Enum.
/// Every API call and page operation reports failures through this type.
#[derive(Debug, Error)]
pub enum AppError {
    // 401 from the server, or a session that is missing/expired locally.
    #[error("Unauthorized")]
    Unauthorized,

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // Client-side validation failure; never reaches the network.
    #[error("{0}")]
    BadRequest(String),

    // Submit attempted before every question has an answer.
    #[error("Please answer all questions before submitting. ({answered}/{total} answered)")]
    Incomplete { answered: usize, total: usize },

    // Any other non-2xx response.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response format from server: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    /// Text suitable for a transient notification.
    /// Server-provided messages win, otherwise the call site's fallback is used.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api { message, .. } | AppError::NotFound(message) if !message.is_empty() => {
                message.clone()
            }
            AppError::BadRequest(message) => message.clone(),
            AppError::Incomplete { .. } => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_preferred_over_fallback() {
        let err = AppError::Api {
            status: 422,
            message: "Quiz is closed".to_string(),
        };
        assert_eq!(err.user_message("Failed to submit quiz."), "Quiz is closed");
    }

    #[test]
    fn empty_server_message_uses_fallback() {
        let err = AppError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message("Failed to submit quiz."), "Failed to submit quiz.");
        assert_eq!(
            AppError::Unauthorized.user_message("Failed to load quiz details."),
            "Failed to load quiz details."
        );
    }
}
