//! Persistence port for assignments

use async_trait::async_trait;

use core_kernel::{PatientId, PortError, Repository};

use crate::assignment::Assignment;

/// Assignment storage with the lookup discharge and listing need
#[async_trait]
pub trait AssignmentRepository: Repository<Assignment> {
    /// Every stored assignment referencing the patient, deleted ones included
    async fn find_by_patient(&self, patient_id: PatientId) -> Result<Vec<Assignment>, PortError>;
}
