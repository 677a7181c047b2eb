//! Error types for the REST boundary and file imports.

use thiserror::Error;
use xplan_core::XplanError;

/// Failure talking to the results backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all: DNS, refused connection, timeout.
    #[error("connection failed: {0}")]
    Transport(String),

    /// The server answered with a 4xx/5xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Transport failures and 5xx responses are worth one retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::Validation(_) => false,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for an end user.
    ///
    /// Transport details are replaced by a generic notice; server messages are
    /// shown as sent.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "connection failed".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => "unexpected response from server".to_string(),
            ApiError::Validation(message) => message.clone(),
        }
    }
}

impl From<ApiError> for XplanError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(msg) => XplanError::Validation(msg),
            ApiError::Decode(msg) => XplanError::Parse(msg),
            other => XplanError::Other(other.to_string()),
        }
    }
}

/// Failure importing a results spreadsheet.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "native-io")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),
}
