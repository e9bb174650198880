//! Patient use cases

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use core_kernel::{AggregateRoot, EventDispatcher, PatientId, Repository};
use domain_assignment::{AssignmentEvent, AssignmentRepository};
use domain_patient::{Capable, Patient, PatientError, PatientEvent};

use crate::assignment_service::archive_assignment;
use crate::dto::RegisterPatientRequest;
use crate::error::ServiceError;
use crate::retry::retry_on_conflict;

/// Registers patients and applies edits through the repository
///
/// Every write loads the patient, remembers its stamp, mutates it, stores it
/// against that stamp and only then dispatches the drained events.
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn Repository<Patient>>,
    assignments: Arc<dyn AssignmentRepository>,
    patient_events: Arc<dyn EventDispatcher<PatientEvent>>,
    assignment_events: Arc<dyn EventDispatcher<AssignmentEvent>>,
    conflict_retries: u32,
}

impl PatientService {
    pub fn new(
        patients: Arc<dyn Repository<Patient>>,
        assignments: Arc<dyn AssignmentRepository>,
        patient_events: Arc<dyn EventDispatcher<PatientEvent>>,
        assignment_events: Arc<dyn EventDispatcher<AssignmentEvent>>,
        conflict_retries: u32,
    ) -> Self {
        Self {
            patients,
            assignments,
            patient_events,
            assignment_events,
            conflict_retries,
        }
    }

    /// Validates the request and stores a new patient
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterPatientRequest) -> Result<Patient, ServiceError> {
        request.validate()?;

        let mut patient = Patient::create(
            request.full_name.clone(),
            request.birthday,
            request.citizenship_info(),
            None,
            None,
            request.note.clone(),
        )?;
        let events = patient.take_events();
        self.patients.insert(patient.clone()).await?;
        self.patient_events.dispatch(events).await?;

        info!(patient_id = %patient.id(), "Patient registered");
        Ok(patient)
    }

    pub async fn get(&self, id: PatientId) -> Result<Patient, ServiceError> {
        Ok(self.patients.get(id).await?)
    }

    #[instrument(skip(self, full_name))]
    pub async fn rename(&self, id: PatientId, full_name: &str) -> Result<Patient, ServiceError> {
        retry_on_conflict(self.conflict_retries, move || {
            self.modify(id, move |patient| patient.change_full_name(full_name))
        })
        .await
    }

    /// Sets the capability record; an existing court ruling is kept
    #[instrument(skip(self, capable))]
    pub async fn update_capable(&self, id: PatientId, capable: Option<Capable>) -> Result<Patient, ServiceError> {
        retry_on_conflict(self.conflict_retries, move || {
            let capable = capable.clone();
            self.modify(id, move |patient| patient.set_capable(capable))
        })
        .await
    }

    #[instrument(skip(self, guardian, guardian_order_appointment))]
    pub async fn change_guardian(
        &self,
        id: PatientId,
        guardian: Option<&str>,
        guardian_order_appointment: Option<&str>,
    ) -> Result<Patient, ServiceError> {
        retry_on_conflict(self.conflict_retries, move || {
            self.modify(id, move |patient| {
                patient.change_guardian(
                    guardian.map(str::to_string),
                    guardian_order_appointment.map(str::to_string),
                )
            })
        })
        .await
    }

    /// Stores a document built from a raw discriminator and number
    ///
    /// A malformed number is kept and logged, not rejected.
    #[instrument(skip(self, number))]
    pub async fn put_document(
        &self,
        id: PatientId,
        discriminator: i32,
        number: Option<&str>,
    ) -> Result<Patient, ServiceError> {
        let patient = retry_on_conflict(self.conflict_retries, move || {
            self.modify(id, move |patient| patient.put_document(discriminator, number))
        })
        .await?;

        for document_type in patient.invalid_documents() {
            warn!(
                patient_id = %id,
                %document_type,
                expected = document_type.format_hint(),
                "Patient holds a malformed document number"
            );
        }
        Ok(patient)
    }

    /// Archives every live assignment referencing the patient, then the patient
    ///
    /// The patient is archived last, so a discharge that fails partway can be
    /// run again and picks up the assignments still active.
    #[instrument(skip(self))]
    pub async fn discharge(&self, id: PatientId) -> Result<Patient, ServiceError> {
        let current = self.patients.get(id).await?;
        if current.is_archived() {
            return Err(PatientError::AlreadyArchived(id.to_string()).into());
        }

        let mut archived = 0usize;
        for assignment in self.assignments.find_by_patient(id).await? {
            if assignment.is_archived() || assignment.is_deleted() {
                continue;
            }
            let assignment_id = assignment.id();
            retry_on_conflict(self.conflict_retries, move || {
                archive_assignment(self.assignments.as_ref(), self.assignment_events.as_ref(), assignment_id)
            })
            .await?;
            archived += 1;
        }

        let patient = retry_on_conflict(self.conflict_retries, move || {
            self.modify(id, |patient| patient.archive())
        })
        .await?;

        info!(patient_id = %id, archived, "Patient discharged");
        Ok(patient)
    }

    /// One load-mutate-store attempt
    ///
    /// A mutation that records no events is not written back.
    async fn modify<R, F>(&self, id: PatientId, mutate: F) -> Result<Patient, ServiceError>
    where
        F: FnOnce(&mut Patient) -> Result<R, PatientError>,
    {
        let mut patient = self.patients.get(id).await?;
        let expected = patient.concurrency_stamp().clone();

        mutate(&mut patient)?;
        let events = patient.take_events();
        if events.is_empty() {
            return Ok(patient);
        }

        self.patients.update(patient.clone(), &expected).await?;
        self.patient_events.dispatch(events).await?;
        Ok(patient)
    }
}
