//! End-to-end tests for the application services over in-memory adapters

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use app_services::*;
use core_kernel::{AggregateRoot, AssignmentId, ConcurrencyStamp, DomainPort, PatientId, PortError, Repository};
use domain_assignment::{Assignment, AssignmentEvent, AssignmentRepository, UPDATED_STATUS};
use domain_patient::{Capable, CitizenshipType, Patient, PatientError, PatientEvent};
use infra_memory::{AssignmentStore, PatientStore, RecordingDispatcher};
use test_utils::*;

struct Harness {
    patients: PatientService,
    assignments: AssignmentService,
    patient_store: PatientStore,
    patient_events: RecordingDispatcher<PatientEvent>,
    assignment_events: RecordingDispatcher<AssignmentEvent>,
}

fn harness() -> Harness {
    let patient_store = PatientStore::new();
    let assignment_store = Arc::new(AssignmentStore::new());
    let patient_events = RecordingDispatcher::new();
    let assignment_events = RecordingDispatcher::new();
    let retries = AppConfig::default().conflict_retries;

    Harness {
        patients: PatientService::new(
            Arc::new(patient_store.clone()),
            assignment_store.clone(),
            Arc::new(patient_events.clone()),
            Arc::new(assignment_events.clone()),
            retries,
        ),
        assignments: AssignmentService::new(
            assignment_store,
            Arc::new(patient_store.clone()),
            Arc::new(assignment_events.clone()),
            retries,
        ),
        patient_store,
        patient_events,
        assignment_events,
    }
}

fn register_request() -> RegisterPatientRequest {
    RegisterPatientRequest {
        full_name: NameFixtures::full_name().to_string(),
        birthday: DateFixtures::birthday(),
        citizenship: CitizenshipType::RussianFederation,
        country: "Россия".to_string(),
        registration: Some("г. Москва".to_string()),
        early_registration_city: None,
        place_of_birth: None,
        note: None,
    }
}

fn details_request() -> AssignmentDetailsRequest {
    let details = TestAssignmentBuilder::new().details();
    AssignmentDetailsRequest {
        accept_date: details.accept_date,
        department_number: details.department_number,
        description: details.description,
        forward_date: details.forward_date,
        forward_department: details.forward_department,
        department_forward_date: details.department_forward_date,
        assignee: details.assignee,
        note: details.note,
    }
}

fn open_request(patient_id: PatientId) -> OpenAssignmentRequest {
    OpenAssignmentRequest {
        patient_id,
        details: details_request(),
    }
}

// ============================================================================
// Patient service
// ============================================================================

mod patient_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_dispatches_created() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();

        assert_eq!(h.patients.get(patient.id()).await.unwrap().full_name(), NameFixtures::full_name());
        assert_eq!(h.patient_events.event_types().await, vec!["PatientCreated"]);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_request() {
        let h = harness();
        let mut request = register_request();
        request.full_name = String::new();

        let error = h.patients.register(request).await.unwrap_err();
        assert!(error.is_validation());
        assert!(h.patient_store.is_empty().await);
    }

    #[tokio::test]
    async fn test_rename_to_same_name_writes_nothing() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        h.patient_events.drain().await;

        let renamed = h.patients.rename(patient.id(), NameFixtures::full_name()).await.unwrap();

        assert_eq!(renamed.concurrency_stamp(), patient.concurrency_stamp());
        assert!(h.patient_events.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_change_guardian_keeps_ruling() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        h.patients
            .update_capable(patient.id(), Some(PatientPartFixtures::capable()))
            .await
            .unwrap();

        let updated = h
            .patients
            .change_guardian(patient.id(), Some("Смирнова О.А."), Some("Приказ №41"))
            .await
            .unwrap();

        let capable = updated.capable().unwrap();
        assert_eq!(capable.court_decision(), PatientPartFixtures::capable().court_decision());
        assert_eq!(capable.guardian(), Some("Смирнова О.А."));
    }

    #[tokio::test]
    async fn test_update_capable_keeps_original_ruling() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let original = PatientPartFixtures::capable();
        h.patients.update_capable(patient.id(), Some(original.clone())).await.unwrap();

        let edit = Capable::new(
            "Решение №2-777/2024",
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            Some("Смирнова О.А.".to_string()),
            None,
        );
        let updated = h.patients.update_capable(patient.id(), Some(edit)).await.unwrap();

        let capable = updated.capable().unwrap();
        assert_eq!(capable.court_decision(), original.court_decision());
        assert_eq!(capable.trial_date(), original.trial_date());
        assert_eq!(capable.guardian(), Some("Смирнова О.А."));
    }

    #[tokio::test]
    async fn test_put_document_keeps_malformed_number() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();

        let updated = h.patients.put_document(patient.id(), 0, Some("12 34")).await.unwrap();

        assert_eq!(updated.documents().len(), 1);
        assert_eq!(updated.invalid_documents().len(), 1);
    }

    #[tokio::test]
    async fn test_put_document_unknown_type() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();

        let error = h.patients.put_document(patient.id(), 42, Some("1")).await.unwrap_err();
        assert!(matches!(error, ServiceError::Patient(PatientError::Document(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_patient() {
        let h = harness();
        let missing = TestPatientBuilder::new().build();
        assert!(h.patients.get(missing.id()).await.unwrap_err().is_not_found());
    }
}

// ============================================================================
// Assignment service
// ============================================================================

mod assignment_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_open_and_edit() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let assignment = h.assignments.open(open_request(patient.id())).await.unwrap();

        let mut request = details_request();
        request.assignee = "Фомина И.Р.".to_string();
        let edited = h.assignments.edit(assignment.id(), request).await.unwrap();

        assert_eq!(edited.assignee(), "Фомина И.Р.");
        assert_eq!(edited.creation_date(), assignment.creation_date());
        assert_status_sequence(edited.status_log(), &[UPDATED_STATUS]);
        assert_eq!(
            h.assignment_events.event_types().await,
            vec!["AssignmentCreated", "StatusAdded", "StatusAdded", "AssignmentUpdated"]
        );
    }

    #[tokio::test]
    async fn test_open_for_unknown_patient() {
        let h = harness();
        let stranger = TestPatientBuilder::new().build();

        let error = h.assignments.open(open_request(stranger.id())).await.unwrap_err();
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn test_open_rejects_blank_assignee() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let mut request = open_request(patient.id());
        request.details.assignee = String::new();

        assert!(h.assignments.open(request).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_add_status() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let assignment = h.assignments.open(open_request(patient.id())).await.unwrap();

        let updated = h.assignments.add_status(assignment.id(), "Направлено в МСЭ").await.unwrap();
        assert_status_sequence(updated.status_log(), &["Направлено в МСЭ"]);
    }

    #[tokio::test]
    async fn test_delete_is_soft_and_checked() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let assignment = h.assignments.open(open_request(patient.id())).await.unwrap();
        h.assignment_events.drain().await;

        h.assignments.delete(assignment.id()).await.unwrap();
        h.assignments.delete(assignment.id()).await.unwrap();

        assert!(h.assignments.get(assignment.id()).await.unwrap().is_deleted());
        assert!(h.assignments.list_for_patient(patient.id()).await.unwrap().is_empty());
        assert_eq!(h.assignment_events.event_types().await, vec!["AssignmentDeleted"]);

        let unknown = TestAssignmentBuilder::new().build();
        assert!(h.assignments.delete(unknown.id()).await.unwrap_err().is_not_found());
    }
}

// ============================================================================
// Discharge
// ============================================================================

mod discharge_tests {
    use super::*;

    #[tokio::test]
    async fn test_discharge_archives_assignments() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        let first = h.assignments.open(open_request(patient.id())).await.unwrap();
        let second = h.assignments.open(open_request(patient.id())).await.unwrap();
        let deleted = h.assignments.open(open_request(patient.id())).await.unwrap();
        h.assignments.delete(deleted.id()).await.unwrap();
        h.assignment_events.drain().await;

        let discharged = h.patients.discharge(patient.id()).await.unwrap();

        assert!(discharged.is_archived());
        assert!(h.assignments.get(first.id()).await.unwrap().is_archived());
        assert!(h.assignments.get(second.id()).await.unwrap().is_archived());
        assert!(!h.assignments.get(deleted.id()).await.unwrap().is_archived());
        assert_event_types(
            &h.assignment_events.recorded().await,
            &["AssignmentArchived", "AssignmentArchived"],
        );
    }

    #[tokio::test]
    async fn test_discharged_patient_rejects_new_assignments() {
        let h = harness();
        let patient = h.patients.register(register_request()).await.unwrap();
        h.patients.discharge(patient.id()).await.unwrap();

        let error = h.assignments.open(open_request(patient.id())).await.unwrap_err();
        assert!(matches!(error, ServiceError::Patient(PatientError::Archived(_))));

        let again = h.patients.discharge(patient.id()).await.unwrap_err();
        assert!(matches!(again, ServiceError::Patient(PatientError::AlreadyArchived(_))));
    }
}

/// Fails the first `failures` assignment updates as if storage were down
struct FlakyAssignments {
    inner: AssignmentStore,
    failures: AtomicU32,
}

impl DomainPort for FlakyAssignments {}

#[async_trait]
impl Repository<Assignment> for FlakyAssignments {
    async fn insert(&self, aggregate: Assignment) -> Result<(), PortError> {
        self.inner.insert(aggregate).await
    }

    async fn get(&self, id: AssignmentId) -> Result<Assignment, PortError> {
        self.inner.get(id).await
    }

    async fn find(&self, id: AssignmentId) -> Result<Option<Assignment>, PortError> {
        self.inner.find(id).await
    }

    async fn update(&self, aggregate: Assignment, expected_stamp: &ConcurrencyStamp) -> Result<(), PortError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PortError::internal("store down"));
        }
        self.inner.update(aggregate, expected_stamp).await
    }

    async fn delete(&self, id: AssignmentId) -> Result<(), PortError> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Assignment>, PortError> {
        self.inner.list().await
    }
}

#[async_trait]
impl AssignmentRepository for FlakyAssignments {
    async fn find_by_patient(&self, patient_id: PatientId) -> Result<Vec<Assignment>, PortError> {
        self.inner.find_by_patient(patient_id).await
    }
}

mod interrupted_discharge_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_discharge_can_be_rerun() {
        let patient_store = PatientStore::new();
        let assignment_store = AssignmentStore::new();
        let assignments = Arc::new(FlakyAssignments {
            inner: assignment_store.clone(),
            failures: AtomicU32::new(1),
        });
        let retries = AppConfig::default().conflict_retries;
        let patients = PatientService::new(
            Arc::new(patient_store.clone()),
            assignments.clone(),
            Arc::new(RecordingDispatcher::<PatientEvent>::new()),
            Arc::new(RecordingDispatcher::<AssignmentEvent>::new()),
            retries,
        );
        let opener = AssignmentService::new(
            assignments,
            Arc::new(patient_store.clone()),
            Arc::new(RecordingDispatcher::<AssignmentEvent>::new()),
            retries,
        );

        let patient = patients.register(register_request()).await.unwrap();
        let assignment = opener.open(open_request(patient.id())).await.unwrap();

        let error = patients.discharge(patient.id()).await.unwrap_err();
        assert!(matches!(error, ServiceError::Port(PortError::Internal { .. })));
        assert!(!patient_store.get(patient.id()).await.unwrap().is_archived());
        assert!(!assignment_store.get(assignment.id()).await.unwrap().is_archived());

        let discharged = patients.discharge(patient.id()).await.unwrap();
        assert!(discharged.is_archived());
        assert!(assignment_store.get(assignment.id()).await.unwrap().is_archived());
    }
}

// ============================================================================
// Conflict retry
// ============================================================================

/// Reports a stale stamp for the first `failures` updates, then delegates
struct ContendedPatients {
    inner: PatientStore,
    failures: AtomicU32,
}

impl DomainPort for ContendedPatients {}

#[async_trait]
impl Repository<Patient> for ContendedPatients {
    async fn insert(&self, aggregate: Patient) -> Result<(), PortError> {
        self.inner.insert(aggregate).await
    }

    async fn get(&self, id: PatientId) -> Result<Patient, PortError> {
        self.inner.get(id).await
    }

    async fn find(&self, id: PatientId) -> Result<Option<Patient>, PortError> {
        self.inner.find(id).await
    }

    async fn update(&self, aggregate: Patient, expected_stamp: &ConcurrencyStamp) -> Result<(), PortError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PortError::concurrency_conflict(
                "Patient",
                aggregate.id(),
                expected_stamp,
                &ConcurrencyStamp::new(),
            ));
        }
        self.inner.update(aggregate, expected_stamp).await
    }

    async fn delete(&self, id: PatientId) -> Result<(), PortError> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Patient>, PortError> {
        self.inner.list().await
    }
}

mod retry_tests {
    use super::*;

    fn contended_service(failures: u32, retries: u32) -> (PatientService, PatientStore) {
        let store = PatientStore::new();
        let patients = Arc::new(ContendedPatients {
            inner: store.clone(),
            failures: AtomicU32::new(failures),
        });
        let service = PatientService::new(
            patients,
            Arc::new(AssignmentStore::new()),
            Arc::new(RecordingDispatcher::<PatientEvent>::new()),
            Arc::new(RecordingDispatcher::<AssignmentEvent>::new()),
            retries,
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_conflict_retried_until_success() {
        let (service, store) = contended_service(2, 2);
        let patient = service.register(register_request()).await.unwrap();

        service.rename(patient.id(), "Смирнов Алексей").await.unwrap();

        assert_eq!(store.get(patient.id()).await.unwrap().full_name(), "Смирнов Алексей");
    }

    #[tokio::test]
    async fn test_conflict_surfaces_after_retries() {
        let (service, store) = contended_service(3, 2);
        let patient = service.register(register_request()).await.unwrap();

        let error = service.rename(patient.id(), "Смирнов Алексей").await.unwrap_err();

        assert!(error.is_conflict());
        assert!(error.is_concurrency_conflict());
        assert_eq!(store.get(patient.id()).await.unwrap().full_name(), NameFixtures::full_name());
    }
}

// ============================================================================
// Wiring
// ============================================================================

#[tokio::test]
async fn test_in_memory_services_share_storage() {
    let (patients, assignments) = in_memory_services(&AppConfig::default());
    let patient = patients.register(register_request()).await.unwrap();

    let assignment = assignments.open(open_request(patient.id())).await.unwrap();
    assert_eq!(assignments.list_for_patient(patient.id()).await.unwrap().len(), 1);
    assert_eq!(assignment.patient_id(), patient.id());

    let birthday = NaiveDate::from_ymd_opt(1957, 9, 21).unwrap();
    assert_eq!(patients.get(patient.id()).await.unwrap().birthday(), birthday);
}
