//! Unit tests for the identifiers module
//!
//! Tests cover creation, parsing, conversion and display formatting.

use core_kernel::{AssignmentId, AtomicValue, PatientId};
use uuid::Uuid;

mod patient_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = PatientId::new();
        let id2 = PatientId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_generates_time_ordered_ids() {
        let id1 = PatientId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = PatientId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = PatientId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(PatientId::prefix(), "PAT");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = PatientId::new();
        let parsed: PatientId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("PAT-not-a-uuid".parse::<PatientId>().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let id = PatientId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let deserialized: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}

mod assignment_id_tests {
    use super::*;

    #[test]
    fn test_prefix_and_display() {
        let id = AssignmentId::new();
        assert_eq!(AssignmentId::prefix(), "ASG");
        assert!(id.to_string().starts_with("ASG-"));
    }

    #[test]
    fn test_default_is_fresh() {
        assert_ne!(AssignmentId::default(), AssignmentId::default());
    }

    #[test]
    fn test_atomic_value_conversion() {
        let id = AssignmentId::new();
        match AtomicValue::from(id) {
            AtomicValue::Uuid(uuid) => assert_eq!(uuid, *id.as_uuid()),
            other => panic!("Expected Uuid atomic value, got {:?}", other),
        }
    }
}
