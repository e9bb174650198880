//! Ports at the persistence and notification boundary
//!
//! The kernel does not persist or publish anything itself. It defines the
//! contracts an adapter must honour:
//!
//! - `Repository::get` / `delete` fail with [`PortError::NotFound`] when the
//!   key is unknown; `delete` verifies existence before removing anything.
//! - `Repository::update` compares the caller's stamp with the persisted one
//!   and fails with [`PortError::ConcurrencyConflict`] when they differ. Both
//!   writers then reload and retry; the adapter never retries on its own.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │     Application services      │
//! └───────────────────────────────┘
//!        │                 │
//!        ▼                 ▼
//!  Repository<A>   EventDispatcher<E>
//!        ▲                 ▲
//!        │                 │
//!  ┌──────────────┐  ┌──────────────┐
//!  │  In-memory / │  │  Recording / │
//!  │  document DB │  │  message bus │
//!  └──────────────┘  └──────────────┘
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::{AggregateRoot, ConcurrencyStamp};
use crate::error::CoreError;
use crate::events::DomainEvent;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The caller's concurrency stamp is stale
    #[error("Concurrency conflict on {entity_type} {id}: expected stamp {expected}, found {actual}")]
    ConcurrencyConflict {
        entity_type: String,
        id: String,
        expected: String,
        actual: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a ConcurrencyConflict error from the presented and persisted stamps
    pub fn concurrency_conflict(
        entity_type: impl Into<String>,
        id: impl fmt::Display,
        presented: &ConcurrencyStamp,
        persisted: &ConcurrencyStamp,
    ) -> Self {
        PortError::ConcurrencyConflict {
            entity_type: entity_type.into(),
            id: id.to_string(),
            expected: presented.to_string(),
            actual: persisted.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if the caller should reload and retry
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, PortError::ConcurrencyConflict { .. })
    }
}

impl From<CoreError> for PortError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound(message) => PortError::NotFound {
                entity_type: "entity".to_string(),
                id: message,
            },
            CoreError::ConcurrencyConflict { expected, actual } => PortError::ConcurrencyConflict {
                entity_type: "entity".to_string(),
                id: String::new(),
                expected,
                actual,
            },
            CoreError::Validation(message) => PortError::validation(message),
            other => PortError::internal(other.to_string()),
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across tasks, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Storage of one aggregate type, keyed by its identifier
#[async_trait]
pub trait Repository<A>: DomainPort
where
    A: AggregateRoot + Clone + Send + Sync + 'static,
{
    /// Stores a new aggregate
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if an aggregate with the same id already exists
    async fn insert(&self, aggregate: A) -> Result<(), PortError>;

    /// Loads an aggregate, failing with `PortError::NotFound` when absent
    async fn get(&self, id: A::Id) -> Result<A, PortError>;

    /// Loads an aggregate if it exists
    async fn find(&self, id: A::Id) -> Result<Option<A>, PortError>;

    /// Returns whether an aggregate with this id exists
    async fn exists(&self, id: A::Id) -> Result<bool, PortError> {
        Ok(self.find(id).await?.is_some())
    }

    /// Replaces a stored aggregate
    ///
    /// `expected_stamp` is the stamp the caller saw when it loaded the
    /// aggregate, before mutating it.
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if absent, `PortError::ConcurrencyConflict` if
    /// the persisted stamp differs from `expected_stamp`
    async fn update(&self, aggregate: A, expected_stamp: &ConcurrencyStamp) -> Result<(), PortError>;

    /// Removes an aggregate after verifying it exists
    async fn delete(&self, id: A::Id) -> Result<(), PortError>;

    /// Returns every stored aggregate
    async fn list(&self) -> Result<Vec<A>, PortError>;
}

/// Publishes drained domain events to whatever transport the caller owns
#[async_trait]
pub trait EventDispatcher<E: DomainEvent>: DomainPort {
    async fn dispatch(&self, events: Vec<E>) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Patient", "123");
        assert!(error.is_not_found());
        assert!(!error.is_concurrency_conflict());
        assert!(error.to_string().contains("Patient"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_port_error_conflict_from_stamps() {
        let presented = ConcurrencyStamp::from_string("old");
        let persisted = ConcurrencyStamp::from_string("new");
        let error = PortError::concurrency_conflict("Assignment", "ASG-1", &presented, &persisted);

        assert!(error.is_concurrency_conflict());
        assert!(error.to_string().contains("expected stamp old"));
    }

    #[test]
    fn test_core_error_conversion() {
        let error: PortError = CoreError::conflict("a", "b").into();
        assert!(error.is_concurrency_conflict());

        let error: PortError = CoreError::validation("bad").into();
        assert!(matches!(error, PortError::Validation { field: None, .. }));
    }
}
