//! Tests for the in-memory adapters

use core_kernel::{AggregateRoot, DomainEvent, EventDispatcher, PortError, Repository};
use domain_assignment::{AssignmentEvent, AssignmentRepository};
use domain_patient::{Patient, PatientEvent};
use infra_memory::{AssignmentStore, InMemoryRepository, LoggingDispatcher, PatientStore, RecordingDispatcher};
use test_utils::*;

// ============================================================================
// Repository contract
// ============================================================================

mod repository_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();
        let id = patient.id();

        repo.insert(patient).await.unwrap();

        let loaded = repo.get(id).await.unwrap();
        assert_eq!(loaded.id(), id);
        assert_eq!(loaded.full_name(), NameFixtures::full_name());
        assert!(repo.exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();

        repo.insert(patient.clone()).await.unwrap();
        let result = repo.insert(patient).await;

        assert!(matches!(result, Err(PortError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_stored_copy_has_no_pending_events() {
        let repo = PatientStore::new();
        let patient = Patient::create(
            "Громов Олег",
            DateFixtures::birthday(),
            PatientPartFixtures::citizenship(),
            None,
            None,
            None,
        )
        .unwrap();
        let id = patient.id();
        repo.insert(patient).await.unwrap();

        assert!(repo.get(id).await.unwrap().pending_events().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = PatientStore::new();
        let missing = TestPatientBuilder::new().build();

        let result = repo.get(missing.id()).await;

        assert!(result.unwrap_err().is_not_found());
        assert!(repo.find(missing.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_with_current_stamp() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();
        let id = patient.id();
        repo.insert(patient).await.unwrap();

        let mut loaded = repo.get(id).await.unwrap();
        let stamp = loaded.concurrency_stamp().clone();
        loaded.set_note(Some("Нуждается в сопровождении".into())).unwrap();
        repo.update(loaded, &stamp).await.unwrap();

        let reloaded = repo.get(id).await.unwrap();
        assert_eq!(reloaded.note(), Some("Нуждается в сопровождении"));
        assert_stamp_changed(&stamp, reloaded.concurrency_stamp());
    }

    #[tokio::test]
    async fn test_stale_stamp_is_conflict() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();
        let id = patient.id();
        repo.insert(patient).await.unwrap();

        // Two writers load the same version
        let mut first = repo.get(id).await.unwrap();
        let mut second = repo.get(id).await.unwrap();
        let stamp = first.concurrency_stamp().clone();

        first.change_full_name("Смирнов Алексей").unwrap();
        repo.update(first, &stamp).await.unwrap();

        second.set_note(Some("x".into())).unwrap();
        let result = repo.update(second, &stamp).await;

        let error = result.unwrap_err();
        assert!(error.is_concurrency_conflict());
        assert_eq!(repo.get(id).await.unwrap().note(), None);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();
        let stamp = patient.concurrency_stamp().clone();

        let result = repo.update(patient, &stamp).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_checks_existence() {
        let repo = PatientStore::new();
        let patient = TestPatientBuilder::new().build();
        let id = patient.id();

        assert!(repo.delete(id).await.unwrap_err().is_not_found());

        repo.insert(patient).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryRepository::<Patient>::new();
        let other = repo.clone();

        repo.insert(TestPatientBuilder::new().build()).await.unwrap();
        repo.insert(TestPatientBuilder::new().with_full_name(NameFixtures::random_full_name()).build())
            .await
            .unwrap();

        assert_eq!(other.len().await, 2);
        assert_eq!(other.list().await.unwrap().len(), 2);
    }
}

// ============================================================================
// Assignment lookups
// ============================================================================

mod assignment_lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_patient() {
        let repo = AssignmentStore::new();
        let patient = TestPatientBuilder::new().build();

        let first = TestAssignmentBuilder::new().for_patient(patient.id()).build();
        let second = TestAssignmentBuilder::new()
            .for_patient(patient.id())
            .with_description("Оформление пенсии")
            .build();
        let unrelated = TestAssignmentBuilder::new().build();

        repo.insert(first.clone()).await.unwrap();
        repo.insert(second.clone()).await.unwrap();
        repo.insert(unrelated).await.unwrap();

        let found = repo.find_by_patient(patient.id()).await.unwrap();
        let ids: Vec<_> = found.iter().map(|a| a.id()).collect();
        assert_eq!(found.len(), 2);
        assert!(ids.contains(&first.id()));
        assert!(ids.contains(&second.id()));
    }

    #[tokio::test]
    async fn test_find_by_patient_empty() {
        let repo = AssignmentStore::new();
        let patient = TestPatientBuilder::new().build();
        assert!(repo.find_by_patient(patient.id()).await.unwrap().is_empty());
    }
}

// ============================================================================
// Dispatchers
// ============================================================================

mod dispatcher_tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_dispatcher_keeps_order() {
        let dispatcher = RecordingDispatcher::<AssignmentEvent>::new();
        let mut assignment = domain_assignment::Assignment::create(
            TestAssignmentBuilder::new().details(),
            TestPatientBuilder::new().build().id(),
        );

        dispatcher.dispatch(assignment.take_events()).await.unwrap();
        assignment.add_status("Передано в МСЭ").unwrap();
        dispatcher.dispatch(assignment.take_events()).await.unwrap();

        assert_eq!(
            dispatcher.event_types().await,
            vec!["AssignmentCreated", "StatusAdded", "StatusAdded"]
        );
        assert_eq!(dispatcher.drain().await.len(), 3);
        assert!(dispatcher.recorded().await.is_empty());
    }

    #[tokio::test]
    async fn test_logging_dispatcher_accepts_events() {
        let dispatcher = LoggingDispatcher;
        let event = PatientEvent::deleted(TestPatientBuilder::new().build().id());
        assert_eq!(event.event_type(), "PatientDeleted");

        dispatcher.dispatch(vec![event]).await.unwrap();
    }
}
