//! Assignment Domain
//!
//! Work items the social department opens for a patient: where the request
//! came from, where it was forwarded and who handles it. Each assignment
//! keeps an append-only status history that starts with a creation entry and
//! gains an update entry on every edit.

pub mod assignment;
pub mod status;
pub mod events;
pub mod ports;
pub mod error;

pub use assignment::{Assignment, AssignmentDetails, AssignmentState};
pub use status::{StatusEntry, StatusLog, CREATED_STATUS, UPDATED_STATUS};
pub use events::AssignmentEvent;
pub use ports::AssignmentRepository;
pub use error::AssignmentError;
