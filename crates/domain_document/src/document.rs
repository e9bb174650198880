//! Document value object
//!
//! A document is a [`DocumentType`] plus an optional raw number. Validity is
//! advisory: a document with a malformed or missing number can still be
//! stored while staff correct it, and [`Document::is_valid`] simply reports
//! false.

use serde::{Deserialize, Serialize};

use core_kernel::impl_value_semantics;
use core_kernel::{AtomicValue, HashCache, ValueObject};

use crate::document_type::DocumentType;
use crate::error::DocumentError;

/// An identity document held for a patient
///
/// Equality and ordering are by discriminator, then by number string.
///
/// # Examples
///
/// ```rust
/// use domain_document::{Document, DocumentType};
///
/// let passport = Document::passport("1234 567890");
/// assert_eq!(passport.document_type(), DocumentType::Passport);
/// assert!(passport.is_valid());
///
/// let blank = Document::new(DocumentType::Snils, None);
/// assert!(!blank.is_valid());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    document_type: DocumentType,
    number: Option<String>,
    #[serde(skip)]
    hash: HashCache,
}

impl Document {
    /// Creates a document, trimming the number and treating blank as missing
    pub fn new(document_type: DocumentType, number: Option<&str>) -> Self {
        let number = number
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Self {
            document_type,
            number,
            hash: HashCache::new(),
        }
    }

    pub fn passport(number: &str) -> Self {
        Self::new(DocumentType::Passport, Some(number))
    }

    pub fn medical_policy(number: &str) -> Self {
        Self::new(DocumentType::MedicalPolicy, Some(number))
    }

    pub fn snils(number: &str) -> Self {
        Self::new(DocumentType::Snils, Some(number))
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// Whether the number is present and well-formed; never fails
    pub fn is_valid(&self) -> bool {
        self.number
            .as_deref()
            .map_or(false, |number| self.document_type.matches(number))
    }

    /// Like [`is_valid`](Self::is_valid) but surfaces the failure as an error
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidNumber` for a missing or malformed number
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DocumentError::InvalidNumber {
                document_type: self.document_type,
                number: self.number.clone(),
            })
        }
    }
}

impl ValueObject for Document {
    fn type_name(&self) -> &'static str {
        "Document"
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        vec![
            self.document_type.discriminator().into(),
            self.number.as_deref().into(),
        ]
    }

    fn hash_cache(&self) -> Option<&HashCache> {
        Some(&self.hash)
    }
}

impl_value_semantics!(Document);
