//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::{ConcurrencyStamp, DomainEvent};
use domain_assignment::{StatusLog, CREATED_STATUS};

/// Asserts that a mutation produced a new concurrency stamp
///
/// # Panics
///
/// Panics if the stamps are equal
pub fn assert_stamp_changed(before: &ConcurrencyStamp, after: &ConcurrencyStamp) {
    assert_ne!(before, after, "Concurrency stamp was not regenerated: {}", after);
}

/// Asserts that events have exactly the given types, in order
pub fn assert_event_types<E: DomainEvent>(events: &[E], expected: &[&str]) {
    let actual: Vec<&str> = events.iter().map(|event| event.event_type()).collect();
    assert_eq!(
        actual, expected,
        "Event types differ: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts that a status log starts with the creation entry and then holds
/// the given statuses in order
pub fn assert_status_sequence(log: &StatusLog, following: &[&str]) {
    let statuses: Vec<&str> = log.iter().map(|entry| entry.status.as_str()).collect();
    assert_eq!(
        statuses.first().copied(),
        Some(CREATED_STATUS),
        "Status log must open with the creation entry: {:?}",
        statuses
    );
    assert_eq!(&statuses[1..], following, "Unexpected statuses after creation");
}
