//! Entity identity and the aggregate-root contract
//!
//! Entities are equal when their keys are equal, whatever their other fields
//! hold. Aggregate roots additionally carry a [`ConcurrencyStamp`] that the
//! aggregate regenerates on every committed mutation; repositories compare it
//! against the stamp a caller loaded to detect lost updates.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::events::DomainEvent;
use crate::value_object::AtomicValue;

/// Anything with a durable identity key
pub trait Entity {
    /// Entity kind; keys are only comparable between entities of the same kind
    const KIND: &'static str;

    /// The ordered key components, stable for the entity's lifetime
    fn keys(&self) -> Vec<AtomicValue>;

    /// Identity comparison: same kind and identical key sequences
    fn equals_entity<O: Entity + ?Sized>(&self, other: &O) -> bool {
        Self::KIND == O::KIND && self.keys() == other.keys()
    }
}

/// Identity comparison where either side may be absent
pub fn entity_eq<A: Entity, B: Entity>(left: Option<&A>, right: Option<&B>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left.equals_entity(right),
        _ => false,
    }
}

/// Opaque optimistic-concurrency token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcurrencyStamp(String);

impl ConcurrencyStamp {
    /// Creates a fresh random stamp
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps a stamp previously handed out to a caller
    pub fn from_string(stamp: impl Into<String>) -> Self {
        Self(stamp.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces this stamp with a fresh one
    pub fn regenerate(&mut self) {
        *self = Self::new();
    }

    /// Checks a caller-presented stamp against this (current) one
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ConcurrencyConflict` when they differ
    pub fn ensure_matches(&self, presented: &ConcurrencyStamp) -> Result<(), CoreError> {
        if self == presented {
            Ok(())
        } else {
            Err(CoreError::conflict(presented.as_str(), self.as_str()))
        }
    }
}

impl Default for ConcurrencyStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConcurrencyStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single mutation boundary of a cluster of objects
pub trait AggregateRoot: Entity {
    /// Identifier type
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;
    /// Domain events recorded by mutations
    type Event: DomainEvent;

    fn id(&self) -> Self::Id;

    fn concurrency_stamp(&self) -> &ConcurrencyStamp;

    /// Events recorded since the last drain
    fn pending_events(&self) -> &[Self::Event];

    /// Returns accumulated domain events and clears them
    fn take_events(&mut self) -> Vec<Self::Event>;
}
