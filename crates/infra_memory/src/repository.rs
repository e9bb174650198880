//! Generic in-memory aggregate repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use core_kernel::{AggregateRoot, ConcurrencyStamp, DomainPort, PortError, Repository};
use domain_assignment::Assignment;
use domain_patient::Patient;

/// Patient storage
pub type PatientStore = InMemoryRepository<Patient>;

/// Assignment storage
pub type AssignmentStore = InMemoryRepository<Assignment>;

/// Aggregates kept in a shared map guarded by an async read-write lock
///
/// Clones share the same map. Stored copies never carry pending events; the
/// caller drains them before writing.
#[derive(Debug)]
pub struct InMemoryRepository<A: AggregateRoot> {
    entries: Arc<RwLock<HashMap<A::Id, A>>>,
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored aggregates
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub(crate) fn entries(&self) -> &RwLock<HashMap<A::Id, A>> {
        &self.entries
    }
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<A> DomainPort for InMemoryRepository<A> where A: AggregateRoot + Send + Sync + 'static {}

#[async_trait]
impl<A> Repository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + Send + Sync + 'static,
{
    #[instrument(skip(self, aggregate), fields(kind = A::KIND, id = %aggregate.id()))]
    async fn insert(&self, mut aggregate: A) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        let id = aggregate.id();
        if entries.contains_key(&id) {
            warn!("Duplicate insert rejected");
            return Err(PortError::conflict(format!("{} {} already exists", A::KIND, id)));
        }

        aggregate.take_events();
        entries.insert(id, aggregate);
        debug!("Aggregate inserted");
        Ok(())
    }

    #[instrument(skip(self), fields(kind = A::KIND))]
    async fn get(&self, id: A::Id) -> Result<A, PortError> {
        self.find(id)
            .await?
            .ok_or_else(|| PortError::not_found(A::KIND, id))
    }

    async fn find(&self, id: A::Id) -> Result<Option<A>, PortError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    #[instrument(skip(self, aggregate, expected_stamp), fields(kind = A::KIND, id = %aggregate.id()))]
    async fn update(&self, mut aggregate: A, expected_stamp: &ConcurrencyStamp) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        let id = aggregate.id();
        let current = entries
            .get(&id)
            .ok_or_else(|| PortError::not_found(A::KIND, id))?;

        if current.concurrency_stamp().ensure_matches(expected_stamp).is_err() {
            warn!(presented = %expected_stamp, persisted = %current.concurrency_stamp(), "Stale concurrency stamp");
            return Err(PortError::concurrency_conflict(
                A::KIND,
                id,
                expected_stamp,
                current.concurrency_stamp(),
            ));
        }

        aggregate.take_events();
        entries.insert(id, aggregate);
        debug!("Aggregate updated");
        Ok(())
    }

    #[instrument(skip(self), fields(kind = A::KIND))]
    async fn delete(&self, id: A::Id) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        if entries.remove(&id).is_none() {
            return Err(PortError::not_found(A::KIND, id));
        }
        debug!("Aggregate deleted");
        Ok(())
    }

    /// Order is unspecified
    async fn list(&self) -> Result<Vec<A>, PortError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }
}
