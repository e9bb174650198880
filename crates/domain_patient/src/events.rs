//! Domain events for the patient aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DomainEvent, PatientId};
use domain_document::DocumentType;

/// Part of the patient that an update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientField {
    FullName,
    CitizenshipInfo,
    Capable,
    Pension,
    Note,
    Documents,
}

/// Domain events emitted by the Patient aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatientEvent {
    /// Patient has been registered
    PatientCreated {
        patient_id: PatientId,
        full_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A sub-object or field was replaced
    PatientUpdated {
        patient_id: PatientId,
        field: PatientField,
        timestamp: DateTime<Utc>,
    },

    /// A document was added or replaced
    DocumentAdded {
        patient_id: PatientId,
        document_type: DocumentType,
        is_valid: bool,
        timestamp: DateTime<Utc>,
    },

    /// Patient was discharged and archived
    PatientArchived {
        patient_id: PatientId,
        timestamp: DateTime<Utc>,
    },

    /// Patient record was removed by the repository
    PatientDeleted {
        patient_id: PatientId,
        timestamp: DateTime<Utc>,
    },
}

impl PatientEvent {
    /// Event for a repository-level deletion, which the aggregate never sees
    pub fn deleted(patient_id: PatientId) -> Self {
        PatientEvent::PatientDeleted {
            patient_id,
            timestamp: Utc::now(),
        }
    }

    /// Returns the patient ID associated with this event
    pub fn patient_id(&self) -> PatientId {
        match self {
            PatientEvent::PatientCreated { patient_id, .. }
            | PatientEvent::PatientUpdated { patient_id, .. }
            | PatientEvent::DocumentAdded { patient_id, .. }
            | PatientEvent::PatientArchived { patient_id, .. }
            | PatientEvent::PatientDeleted { patient_id, .. } => *patient_id,
        }
    }
}

impl DomainEvent for PatientEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PatientEvent::PatientCreated { .. } => "PatientCreated",
            PatientEvent::PatientUpdated { .. } => "PatientUpdated",
            PatientEvent::DocumentAdded { .. } => "DocumentAdded",
            PatientEvent::PatientArchived { .. } => "PatientArchived",
            PatientEvent::PatientDeleted { .. } => "PatientDeleted",
        }
    }

    fn aggregate_id(&self) -> String {
        self.patient_id().to_string()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PatientEvent::PatientCreated { timestamp, .. }
            | PatientEvent::PatientUpdated { timestamp, .. }
            | PatientEvent::DocumentAdded { timestamp, .. }
            | PatientEvent::PatientArchived { timestamp, .. }
            | PatientEvent::PatientDeleted { timestamp, .. } => *timestamp,
        }
    }
}
