//! Error types for the remotefm library.

use thiserror::Error;

/// Main error type for remotefm operations.
#[derive(Error, Debug)]
pub enum FmError {
    /// The login endpoint rejected the supplied credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An authenticated endpoint answered 401, or no credentials are held.
    #[error("Unauthorized")]
    Unauthorized,

    /// Transport failure, no server response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded, but not successfully.
    #[error("Operation failed ({status}): {message}")]
    OperationFailed { status: u16, message: String },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O error (credential store, download sink, upload source).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An action for the same target is still in flight.
    #[error("Operation already in progress for {0}")]
    Busy(String),

    /// A directory-only operation was given a file entry.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

impl FmError {
    /// True when the error must force the session back to the login state.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FmError::Unauthorized)
    }

    /// Short, human-readable text suitable for a status line.
    pub fn status_message(&self) -> String {
        match self {
            FmError::InvalidCredentials => "Invalid credentials".to_string(),
            FmError::Unauthorized => "Session expired, please log in again".to_string(),
            FmError::Network(_) => "Server unreachable".to_string(),
            FmError::OperationFailed { message, .. } if !message.is_empty() => message.clone(),
            FmError::OperationFailed { status, .. } => format!("Server error ({})", status),
            FmError::Busy(target) => format!("Still working on {}", target),
            other => other.to_string(),
        }
    }
}

/// Result type alias for remotefm operations.
pub type Result<T> = std::result::Result<T, FmError>;
