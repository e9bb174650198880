//! Domain events for the assignment aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AssignmentId, DomainEvent, PatientId};

/// Domain events emitted by the Assignment aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentEvent {
    /// Assignment has been opened for a patient
    AssignmentCreated {
        assignment_id: AssignmentId,
        patient_id: PatientId,
        timestamp: DateTime<Utc>,
    },

    /// Assignment details were edited
    AssignmentUpdated {
        assignment_id: AssignmentId,
        timestamp: DateTime<Utc>,
    },

    /// A status entry was appended
    StatusAdded {
        assignment_id: AssignmentId,
        status: String,
        timestamp: DateTime<Utc>,
    },

    /// Assignment was archived, usually on patient discharge
    AssignmentArchived {
        assignment_id: AssignmentId,
        timestamp: DateTime<Utc>,
    },

    /// Assignment was soft-deleted
    AssignmentDeleted {
        assignment_id: AssignmentId,
        timestamp: DateTime<Utc>,
    },
}

impl AssignmentEvent {
    /// Returns the assignment ID associated with this event
    pub fn assignment_id(&self) -> AssignmentId {
        match self {
            AssignmentEvent::AssignmentCreated { assignment_id, .. }
            | AssignmentEvent::AssignmentUpdated { assignment_id, .. }
            | AssignmentEvent::StatusAdded { assignment_id, .. }
            | AssignmentEvent::AssignmentArchived { assignment_id, .. }
            | AssignmentEvent::AssignmentDeleted { assignment_id, .. } => *assignment_id,
        }
    }
}

impl DomainEvent for AssignmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AssignmentEvent::AssignmentCreated { .. } => "AssignmentCreated",
            AssignmentEvent::AssignmentUpdated { .. } => "AssignmentUpdated",
            AssignmentEvent::StatusAdded { .. } => "StatusAdded",
            AssignmentEvent::AssignmentArchived { .. } => "AssignmentArchived",
            AssignmentEvent::AssignmentDeleted { .. } => "AssignmentDeleted",
        }
    }

    fn aggregate_id(&self) -> String {
        self.assignment_id().to_string()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        match self {
            AssignmentEvent::AssignmentCreated { timestamp, .. }
            | AssignmentEvent::AssignmentUpdated { timestamp, .. }
            | AssignmentEvent::StatusAdded { timestamp, .. }
            | AssignmentEvent::AssignmentArchived { timestamp, .. }
            | AssignmentEvent::AssignmentDeleted { timestamp, .. } => *timestamp,
        }
    }
}
