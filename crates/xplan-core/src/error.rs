//! Unified error types for the xplan crates
//!
//! This module provides a common error type [`XplanError`] that domain-specific
//! errors (API, import, view) can be converted into at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use xplan_core::{CalculationBasis, XplanResult};
//!
//! fn basis(arg: &str) -> XplanResult<CalculationBasis> {
//!     arg.parse()
//! }
//! ```

use thiserror::Error;

/// Unified error type for all xplan operations.
#[derive(Error, Debug)]
pub enum XplanError {
    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Local validation failures (empty names, unknown metrics, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend failures with no closer match
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using XplanError.
pub type XplanResult<T> = Result<T, XplanError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalculationBasis;

    #[test]
    fn test_error_display() {
        let err = XplanError::Validation("plan name is empty".into());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("plan name is empty"));
    }

    #[test]
    fn test_unknown_basis_is_parse_error() {
        let err = "quarterly".parse::<CalculationBasis>().unwrap_err();
        assert!(matches!(err, XplanError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error:"));
    }
}
