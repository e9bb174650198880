//! Document factory
//!
//! The one place a numeric discriminator is turned into a document. A new
//! document kind is registered by adding a [`DocumentType`] variant and its
//! arm here.

use crate::document::Document;
use crate::document_type::DocumentType;
use crate::error::DocumentError;

/// Builds documents from a discriminator and a raw number
pub struct DocumentFactory;

impl DocumentFactory {
    /// Creates the document matching `discriminator`
    ///
    /// The number is not checked here; call [`Document::is_valid`] for that.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::UnsupportedDocumentType` for an unknown discriminator
    ///
    /// # Examples
    ///
    /// ```rust
    /// use domain_document::DocumentFactory;
    ///
    /// assert!(DocumentFactory::create(0, Some("1234 567890")).unwrap().is_valid());
    /// assert!(!DocumentFactory::create(0, Some("bad")).unwrap().is_valid());
    /// assert!(DocumentFactory::create(99, Some("x")).is_err());
    /// ```
    pub fn create(discriminator: i32, number: Option<&str>) -> Result<Document, DocumentError> {
        let document = match DocumentType::try_from(discriminator)? {
            DocumentType::Passport => Document::new(DocumentType::Passport, number),
            DocumentType::MedicalPolicy => Document::new(DocumentType::MedicalPolicy, number),
            DocumentType::Snils => Document::new(DocumentType::Snils, number),
        };
        Ok(document)
    }

    /// Creates a document for an already-resolved type
    pub fn create_typed(document_type: DocumentType, number: Option<&str>) -> Document {
        Document::new(document_type, number)
    }
}
