//! Event dispatchers
//!
//! The kernel leaves the transport to the caller. These two cover tests and
//! local runs: one keeps events for inspection, the other writes them to the
//! log.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use core_kernel::{DomainEvent, DomainPort, EventDispatcher, PortError};

/// Keeps every dispatched event in order
#[derive(Debug)]
pub struct RecordingDispatcher<E> {
    recorded: Arc<Mutex<Vec<E>>>,
}

impl<E: DomainEvent> RecordingDispatcher<E> {
    pub fn new() -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the events dispatched so far
    pub async fn recorded(&self) -> Vec<E> {
        self.recorded.lock().await.clone()
    }

    pub async fn event_types(&self) -> Vec<&'static str> {
        self.recorded.lock().await.iter().map(|event| event.event_type()).collect()
    }

    /// Empties the record and returns what it held
    pub async fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.recorded.lock().await)
    }
}

impl<E: DomainEvent> Default for RecordingDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RecordingDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            recorded: Arc::clone(&self.recorded),
        }
    }
}

impl<E: DomainEvent> DomainPort for RecordingDispatcher<E> {}

#[async_trait]
impl<E: DomainEvent> EventDispatcher<E> for RecordingDispatcher<E> {
    async fn dispatch(&self, events: Vec<E>) -> Result<(), PortError> {
        self.recorded.lock().await.extend(events);
        Ok(())
    }
}

/// Writes each event to the `tracing` log at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

impl DomainPort for LoggingDispatcher {}

#[async_trait]
impl<E: DomainEvent> EventDispatcher<E> for LoggingDispatcher {
    async fn dispatch(&self, events: Vec<E>) -> Result<(), PortError> {
        for event in &events {
            info!(
                event_type = event.event_type(),
                aggregate_id = %event.aggregate_id(),
                timestamp = %event.timestamp(),
                "Domain event"
            );
        }
        Ok(())
    }
}
