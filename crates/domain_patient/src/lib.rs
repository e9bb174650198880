//! Patient Domain
//!
//! The patient aggregate and its value-object sub-parts:
//! - Citizenship and registration
//! - Legal capacity and guardianship
//! - Disability pension
//! - Identity documents keyed by type
//!
//! Each sub-part is replaced as a whole. A replacement equal to the current
//! value is a no-op: no event, no new concurrency stamp.

pub mod citizenship;
pub mod capable;
pub mod pension;
pub mod patient;
pub mod events;
pub mod error;

pub use citizenship::{CitizenshipInfo, CitizenshipType, EarlyRegistration};
pub use capable::Capable;
pub use pension::{DisabilityGroup, Pension, PensionPaymentMethod};
pub use patient::Patient;
pub use events::{PatientEvent, PatientField};
pub use error::PatientError;
