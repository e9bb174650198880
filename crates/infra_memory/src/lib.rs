//! In-Memory Infrastructure
//!
//! Process-local adapters for the kernel's ports. They honour the same
//! contracts a database adapter must:
//!
//! - `insert` refuses duplicate ids
//! - `get`, `update` and `delete` fail with `NotFound` for unknown ids
//! - `update` rejects a stale concurrency stamp
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_memory::{InMemoryRepository, RecordingDispatcher};
//!
//! let patients = InMemoryRepository::<Patient>::new();
//! patients.insert(patient).await?;
//! ```

pub mod repository;
pub mod assignments;
pub mod dispatcher;

pub use repository::{InMemoryRepository, PatientStore, AssignmentStore};
pub use dispatcher::{RecordingDispatcher, LoggingDispatcher};
