//! Document type discriminator
//!
//! A closed set resolved by [`DocumentType::try_from`]; there are no shared
//! mutable singletons per type.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

// ASCII classes only: `\d` would also accept non-ASCII digits
static PASSPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4} [0-9]{6}$").expect("static passport pattern compiles")
});

static MEDICAL_POLICY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{16}$").expect("static medical policy pattern compiles")
});

static SNILS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{3} [0-9]{2}$").expect("static SNILS pattern compiles")
});

/// Kind of identity document held for a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Internal passport
    Passport = 0,
    /// Compulsory medical insurance policy
    MedicalPolicy = 1,
    /// Individual insurance account number (СНИЛС)
    Snils = 2,
}

impl DocumentType {
    /// Every known document type, in discriminator order
    pub fn all() -> [DocumentType; 3] {
        [DocumentType::Passport, DocumentType::MedicalPolicy, DocumentType::Snils]
    }

    /// Returns the numeric discriminator
    pub fn discriminator(self) -> i32 {
        self as i32
    }

    /// Returns the name shown to department staff
    pub fn display_name(self) -> &'static str {
        match self {
            DocumentType::Passport => "Паспорт",
            DocumentType::MedicalPolicy => "Полис ОМС",
            DocumentType::Snils => "СНИЛС",
        }
    }

    /// Human-readable description of the expected number format
    pub fn format_hint(self) -> &'static str {
        match self {
            DocumentType::Passport => "4 digits, space, 6 digits (1234 567890)",
            DocumentType::MedicalPolicy => "16 digits (1234567890123456)",
            DocumentType::Snils => "XXX-XXX-XXX XX (123-456-789 01)",
        }
    }

    /// Checks a raw number against this type's format
    pub fn matches(self, number: &str) -> bool {
        let pattern = match self {
            DocumentType::Passport => &PASSPORT_PATTERN,
            DocumentType::MedicalPolicy => &MEDICAL_POLICY_PATTERN,
            DocumentType::Snils => &SNILS_PATTERN,
        };
        pattern.is_match(number)
    }
}

impl TryFrom<i32> for DocumentType {
    type Error = DocumentError;

    fn try_from(discriminator: i32) -> Result<Self, Self::Error> {
        match discriminator {
            0 => Ok(DocumentType::Passport),
            1 => Ok(DocumentType::MedicalPolicy),
            2 => Ok(DocumentType::Snils),
            other => Err(DocumentError::UnsupportedDocumentType(other)),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
