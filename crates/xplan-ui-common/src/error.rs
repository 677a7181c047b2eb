//! Error types for UI services.

use thiserror::Error;
use xplan_io::ApiError;

/// Result type for UI service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from UI service operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected locally before anything changed.
    #[error("{0}")]
    Validation(String),

    /// No plan with this id.
    #[error("plan not found: {0}")]
    PlanNotFound(crate::PlanId),

    /// No candidate with this id in the plan.
    #[error("candidate not found: {0}")]
    CandidateNotFound(crate::CandidateId),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A background task died before reporting back.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Task(e.to_string())
    }
}
