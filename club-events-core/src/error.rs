//! Error types for the club events client.

use thiserror::Error;

/// Errors that can occur while talking to the events service.
///
/// Variants fall in two classes. Classified errors carry a known cause with a
/// message that can be shown to a user as-is. Everything else is unclassified
/// and gets replaced by a generic fallback message when displayed.
#[derive(Error, Debug)]
pub enum EventsError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl EventsError {
    /// Whether the failure has a known, user-presentable cause.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            EventsError::NotFound(_)
                | EventsError::Validation(_)
                | EventsError::Unauthorized(_)
                | EventsError::Conflict(_)
                | EventsError::Server { .. }
        )
    }

    /// Reduce the error to a display string.
    ///
    /// Classified errors use their own message, unclassified ones the given fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        if self.is_classified() {
            self.to_string()
        } else {
            fallback.to_string()
        }
    }
}

/// Result type alias for events operations.
pub type EventsResult<T> = Result<T, EventsError>;
