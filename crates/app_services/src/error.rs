//! Application service errors

use thiserror::Error;

use core_kernel::PortError;
use domain_assignment::AssignmentError;
use domain_patient::PatientError;

/// Errors returned by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request failed field validation
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// Storage or dispatch failed
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Configuration could not be loaded or applied
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ServiceError {
    /// Returns true for stale-stamp and duplicate-key conflicts
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ServiceError::Port(PortError::ConcurrencyConflict { .. } | PortError::Conflict { .. })
        )
    }

    /// Returns true when a reload and retry may succeed
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, ServiceError::Port(error) if error.is_concurrency_conflict())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Port(error) if error.is_not_found())
    }

    /// Returns true for request and aggregate validation failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidRequest(_)
                | ServiceError::Port(PortError::Validation { .. })
                | ServiceError::Patient(PatientError::Validation(_))
                | ServiceError::Assignment(AssignmentError::Validation(_))
        )
    }
}
