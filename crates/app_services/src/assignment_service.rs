//! Assignment use cases

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{AggregateRoot, AssignmentId, EventDispatcher, PatientId, Repository};
use domain_assignment::{Assignment, AssignmentDetails, AssignmentError, AssignmentEvent, AssignmentRepository};
use domain_patient::{Patient, PatientError};

use crate::dto::{AssignmentDetailsRequest, OpenAssignmentRequest};
use crate::error::ServiceError;
use crate::retry::retry_on_conflict;

/// Opens, edits and soft-deletes assignments
#[derive(Clone)]
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    patients: Arc<dyn Repository<Patient>>,
    events: Arc<dyn EventDispatcher<AssignmentEvent>>,
    conflict_retries: u32,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        patients: Arc<dyn Repository<Patient>>,
        events: Arc<dyn EventDispatcher<AssignmentEvent>>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            assignments,
            patients,
            events,
            conflict_retries,
        }
    }

    /// Opens an assignment for an existing, non-archived patient
    #[instrument(skip(self, request), fields(patient_id = %request.patient_id))]
    pub async fn open(&self, request: OpenAssignmentRequest) -> Result<Assignment, ServiceError> {
        request.validate()?;

        let patient = self.patients.get(request.patient_id).await?;
        if patient.is_archived() {
            return Err(PatientError::Archived(patient.id().to_string()).into());
        }

        let mut assignment = Assignment::create(request.details.into(), patient.id());
        let events = assignment.take_events();
        self.assignments.insert(assignment.clone()).await?;
        self.events.dispatch(events).await?;

        info!(assignment_id = %assignment.id(), "Assignment opened");
        Ok(assignment)
    }

    pub async fn get(&self, id: AssignmentId) -> Result<Assignment, ServiceError> {
        Ok(self.assignments.get(id).await?)
    }

    /// Live assignments of a patient, oldest first
    pub async fn list_for_patient(&self, patient_id: PatientId) -> Result<Vec<Assignment>, ServiceError> {
        let assignments = self.assignments.find_by_patient(patient_id).await?;
        Ok(assignments.into_iter().filter(|a| !a.is_deleted()).collect())
    }

    #[instrument(skip(self, request))]
    pub async fn edit(&self, id: AssignmentId, request: AssignmentDetailsRequest) -> Result<Assignment, ServiceError> {
        request.validate()?;
        retry_on_conflict(self.conflict_retries, move || {
            let details: AssignmentDetails = request.clone().into();
            modify_assignment(self.assignments.as_ref(), self.events.as_ref(), id, move |assignment| {
                assignment.edit(details)
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn add_status(&self, id: AssignmentId, status: &str) -> Result<Assignment, ServiceError> {
        retry_on_conflict(self.conflict_retries, move || {
            modify_assignment(self.assignments.as_ref(), self.events.as_ref(), id, move |assignment| {
                assignment.add_status(status)
            })
        })
        .await
    }

    /// Soft-deletes an assignment
    ///
    /// Fails with not-found for an unknown id; deleting twice is a no-op.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: AssignmentId) -> Result<(), ServiceError> {
        retry_on_conflict(self.conflict_retries, move || {
            modify_assignment(self.assignments.as_ref(), self.events.as_ref(), id, |assignment| {
                Ok(assignment.mark_deleted())
            })
        })
        .await?;

        info!(assignment_id = %id, "Assignment deleted");
        Ok(())
    }
}

/// Archives one assignment as part of a patient discharge
pub(crate) async fn archive_assignment(
    assignments: &dyn AssignmentRepository,
    events: &dyn EventDispatcher<AssignmentEvent>,
    id: AssignmentId,
) -> Result<Assignment, ServiceError> {
    modify_assignment(assignments, events, id, |assignment| assignment.archive()).await
}

/// One load-mutate-store attempt
///
/// A mutation that records no events is not written back.
async fn modify_assignment<R, F>(
    assignments: &dyn AssignmentRepository,
    events: &dyn EventDispatcher<AssignmentEvent>,
    id: AssignmentId,
    mutate: F,
) -> Result<Assignment, ServiceError>
where
    F: FnOnce(&mut Assignment) -> Result<R, AssignmentError>,
{
    let mut assignment = assignments.get(id).await?;
    let expected = assignment.concurrency_stamp().clone();

    mutate(&mut assignment)?;
    let drained = assignment.take_events();
    if drained.is_empty() {
        return Ok(assignment);
    }

    assignments.update(assignment.clone(), &expected).await?;
    events.dispatch(drained).await?;
    Ok(assignment)
}
