//! Assignment domain errors

use thiserror::Error;

/// Errors that can occur in the assignment domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// Invalid state transition attempted
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    /// The assignment is archived and can no longer be changed
    #[error("Assignment {0} is archived")]
    Archived(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AssignmentError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AssignmentError::Validation(message.into())
    }
}
