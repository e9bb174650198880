//! Assignment lookups beyond the generic repository

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{PatientId, PortError};
use domain_assignment::{Assignment, AssignmentRepository};

use crate::repository::InMemoryRepository;

#[async_trait]
impl AssignmentRepository for InMemoryRepository<Assignment> {
    /// Oldest first by creation date
    #[instrument(skip(self))]
    async fn find_by_patient(&self, patient_id: PatientId) -> Result<Vec<Assignment>, PortError> {
        let mut found: Vec<Assignment> = self
            .entries()
            .read()
            .await
            .values()
            .filter(|assignment| assignment.patient_id() == patient_id)
            .cloned()
            .collect();
        found.sort_by_key(|assignment| assignment.creation_date());

        debug!(count = found.len(), "Assignments found for patient");
        Ok(found)
    }
}
