//! Core error types.

use thiserror::Error;

/// Errors raised by local validation before anything reaches the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Input rejected by a calculator or form
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Record not present in the screen cache
    #[error("Record '{id}' not found")]
    RecordNotFound { id: String },
}

impl CoreError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for locally detected bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation { .. })
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
