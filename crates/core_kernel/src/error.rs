//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller holds a stamp that no longer matches the current state
    #[error("Concurrency conflict: expected stamp {expected}, found {actual}")]
    ConcurrencyConflict {
        expected: String,
        actual: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn conflict(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        CoreError::ConcurrencyConflict {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
