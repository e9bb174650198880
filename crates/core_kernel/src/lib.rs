//! Core Kernel - identity and equality semantics shared by every aggregate
//!
//! This crate provides the building blocks used across all domain modules:
//! - Entity identity by key and the aggregate-root concurrency stamp
//! - Value objects compared, ordered and hashed by their atomic values
//! - Strongly-typed identifiers
//! - The domain event contract and the persistence/notification ports

pub mod entity;
pub mod value_object;
pub mod identifiers;
pub mod events;
pub mod ports;
pub mod error;

pub use entity::{Entity, AggregateRoot, ConcurrencyStamp, entity_eq};
pub use value_object::{AtomicValue, HashCache, ValueObject, Tracked};
pub use identifiers::{PatientId, AssignmentId};
pub use events::DomainEvent;
pub use ports::{PortError, DomainPort, Repository, EventDispatcher};
pub use error::CoreError;
