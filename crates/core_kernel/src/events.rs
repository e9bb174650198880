//! Domain event contract
//!
//! Aggregates record events as plain values; callers drain them with
//! `AggregateRoot::take_events` and forward them to an
//! [`EventDispatcher`](crate::ports::EventDispatcher).

use chrono::{DateTime, Utc};

/// A notification recorded by an aggregate mutation
pub trait DomainEvent: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Event type name
    fn event_type(&self) -> &'static str;

    /// Display form of the affected aggregate's key
    fn aggregate_id(&self) -> String;

    /// When the event was recorded (UTC)
    fn timestamp(&self) -> DateTime<Utc>;
}
