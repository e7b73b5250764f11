//! Core error types for the BankrollGod client.
//!
//! The taxonomy separates failures the UI must present differently:
//! validation problems caught before any request is sent, requests the
//! server understood and declined, a backend that could not be reached, and
//! authentication failures that were already handled globally by the
//! transport.

use serde_json::Value;
use thiserror::Error;

use crate::sessions::SessionConflict;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Machine-readable code the backend uses when a bankroll already has an
/// active session.
pub const ACTIVE_SESSION_EXISTS: &str = "ACTIVE_SESSION_EXISTS";

/// Root error type for the client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend was reachable and declined the request.
    #[error("Request rejected: {message}")]
    Rejected {
        status: Option<u16>,
        code: Option<String>,
        message: String,
        details: Option<Value>,
    },

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Backend not reachable: {0}")]
    Unreachable(String),

    /// 401/403 from the backend. Credentials have already been cleared.
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Starting a session was refused because the bankroll already has one.
    #[error("There is already an active session for this bankroll")]
    SessionConflict(Box<SessionConflict>),

    /// Local credential or session-recovery storage failed.
    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create a rejection without HTTP details (e.g. `success: false` in a 200 body).
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            code: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// True when the backend could not be reached at all. Callers offer a
    /// reconnect action instead of an inline message.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_conflict(&self) -> bool {
        match self {
            Self::SessionConflict(_) => true,
            Self::Rejected { code, .. } => code.as_deref() == Some(ACTIVE_SESSION_EXISTS),
            _ => false,
        }
    }

    /// HTTP status of a rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => *status,
            _ => None,
        }
    }

    /// Machine-readable error code carried by the backend response.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => code.as_deref(),
            Self::SessionConflict(_) => Some(ACTIVE_SESSION_EXISTS),
            _ => None,
        }
    }
}

/// Validation errors for user input. Never sent to the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("{0}")]
    Multiple(String),
}

impl ValidationError {
    /// Collapse a list of messages into a single error, or `Ok` when empty.
    pub fn from_messages(messages: Vec<String>) -> std::result::Result<(), ValidationError> {
        match messages.len() {
            0 => Ok(()),
            1 => Err(ValidationError::InvalidInput(
                messages.into_iter().next().unwrap_or_default(),
            )),
            _ => Err(ValidationError::Multiple(messages.join("; "))),
        }
    }
}
