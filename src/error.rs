//! Error types for the Liseuse client engine

use serde::Deserialize;
use thiserror::Error;

/// Machine-readable error codes carried in the remote service's error body.
pub mod codes {
    pub const MEMBER_BANNED: &str = "MEMBER_BANNED";
    pub const BOOK_UNAVAILABLE: &str = "BOOK_UNAVAILABLE";
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Member is banned from borrowing and reserving")]
    MemberBanned,

    #[error("No copies of the book are available")]
    BookUnavailable,

    #[error("Remote service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cannot handle {event} in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Error response body returned by the library service
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AppError {
    /// Builds the error for a non-2xx response, promoting the known machine
    /// codes to their dedicated variants and 404 to `NotFound`.
    pub fn from_remote(status: u16, body: Option<ErrorBody>) -> Self {
        if let Some(body) = &body {
            match body.error.as_deref() {
                Some(codes::MEMBER_BANNED) => return AppError::MemberBanned,
                Some(codes::BOOK_UNAVAILABLE) => return AppError::BookUnavailable,
                _ => {}
            }
        }
        let message = body
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| "unexpected response".to_string());
        if status == 404 {
            return AppError::NotFound(message);
        }
        AppError::Remote { status, message }
    }

    /// True for failures caused by the caller's input rather than the
    /// remote service: the workflow stays where it is and lets the
    /// operator correct the form.
    pub fn is_recoverable_input(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::NotFound(_))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
