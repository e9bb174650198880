//! Document domain errors

use thiserror::Error;

use crate::document_type::DocumentType;

/// Errors that can occur when building or validating documents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The discriminator does not name a known document type
    #[error("Unsupported document type: {0}")]
    UnsupportedDocumentType(i32),

    /// The number is missing or does not match the type's format
    #[error("Invalid {document_type} number: {number:?}")]
    InvalidNumber {
        document_type: DocumentType,
        number: Option<String>,
    },
}

impl DocumentError {
    /// Returns true for malformed-number errors
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, DocumentError::InvalidNumber { .. })
    }
}
