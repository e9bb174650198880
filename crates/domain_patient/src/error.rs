//! Patient domain errors

use thiserror::Error;

use domain_document::{DocumentError, DocumentType};

/// Errors that can occur in the patient domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatientError {
    /// A field failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document was assigned under a key of a different type
    #[error("Document type mismatch: key {key:?} cannot hold a {actual:?} document")]
    DocumentTypeMismatch {
        key: DocumentType,
        actual: DocumentType,
    },

    /// Building a document failed
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The patient is archived and can no longer be changed
    #[error("Patient {0} is archived")]
    Archived(String),

    /// The patient was archived before
    #[error("Patient {0} is already archived")]
    AlreadyArchived(String),
}

impl PatientError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PatientError::Validation(message.into())
    }
}
