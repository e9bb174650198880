//! Document Domain
//!
//! Typed, validated identity document numbers held for patients:
//!
//! | Type | Format | Example |
//! |---|---|---|
//! | Passport | 4 digits, space, 6 digits | `1234 567890` |
//! | Medical policy | 16 digits | `1234567890123456` |
//! | SNILS | `XXX-XXX-XXX XX` | `123-456-789 01` |
//!
//! Documents are value objects built on `core_kernel`'s structural equality.
//! [`DocumentFactory`] maps a numeric discriminator to the right type.

pub mod document_type;
pub mod document;
pub mod factory;
pub mod error;

pub use document_type::DocumentType;
pub use document::Document;
pub use factory::DocumentFactory;
pub use error::DocumentError;
