//! Assignment Aggregate Root
//!
//! An assignment is opened for exactly one patient and never moves to
//! another. Its status log starts with a creation entry; every edit appends an
//! update entry before the new details are applied. The log is carried
//! through edits untouched and never shrinks.
//!
//! # State Machine
//!
//! ```text
//! Active ──archive──► Archived
//! ```
//!
//! The soft-delete flag is orthogonal and can be set from either state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AggregateRoot, AssignmentId, AtomicValue, ConcurrencyStamp, Entity, PatientId};

use crate::error::AssignmentError;
use crate::events::AssignmentEvent;
use crate::status::{StatusLog, CREATED_STATUS, UPDATED_STATUS};

/// The editable part of an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDetails {
    /// Date the department accepted the request
    pub accept_date: NaiveDate,
    /// Hospital department the request came from
    pub department_number: u32,
    pub description: String,
    /// Date the case was forwarded to an outside body
    pub forward_date: NaiveDate,
    /// Outside body the case was forwarded to
    pub forward_department: String,
    /// Date the department forwarded its answer back
    pub department_forward_date: NaiveDate,
    /// Social worker handling the case
    pub assignee: String,
    pub note: Option<String>,
}

/// Lifecycle state of an assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentState {
    Active,
    Archived { archived_at: DateTime<Utc> },
}

/// A social-department assignment for one patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    patient_id: PatientId,
    details: AssignmentDetails,
    creation_date: DateTime<Utc>,
    status_log: StatusLog,
    state: AssignmentState,
    is_deleted: bool,
    /// Token for optimistic concurrency
    concurrency_stamp: ConcurrencyStamp,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<AssignmentEvent>,
}

impl Assignment {
    /// Opens an assignment for a patient with a single creation status entry
    pub fn create(details: AssignmentDetails, patient_id: PatientId) -> Self {
        let id = AssignmentId::new();
        let now = Utc::now();
        Self {
            id,
            patient_id,
            details: normalize(details),
            creation_date: now,
            status_log: StatusLog::started(now),
            state: AssignmentState::Active,
            is_deleted: false,
            concurrency_stamp: ConcurrencyStamp::new(),
            updated_at: now,
            events: vec![
                AssignmentEvent::AssignmentCreated {
                    assignment_id: id,
                    patient_id,
                    timestamp: now,
                },
                AssignmentEvent::StatusAdded {
                    assignment_id: id,
                    status: CREATED_STATUS.to_string(),
                    timestamp: now,
                },
            ],
        }
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn details(&self) -> &AssignmentDetails {
        &self.details
    }

    pub fn accept_date(&self) -> NaiveDate {
        self.details.accept_date
    }

    pub fn department_number(&self) -> u32 {
        self.details.department_number
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn forward_date(&self) -> NaiveDate {
        self.details.forward_date
    }

    pub fn forward_department(&self) -> &str {
        &self.details.forward_department
    }

    pub fn department_forward_date(&self) -> NaiveDate {
        self.details.department_forward_date
    }

    pub fn assignee(&self) -> &str {
        &self.details.assignee
    }

    pub fn note(&self) -> Option<&str> {
        self.details.note.as_deref()
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn status_log(&self) -> &StatusLog {
        &self.status_log
    }

    pub fn state(&self) -> &AssignmentState {
        &self.state
    }

    pub fn is_archived(&self) -> bool {
        matches!(self.state, AssignmentState::Archived { .. })
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records an update entry, then replaces the details
    ///
    /// The creation date, patient reference and status log are kept.
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Archived` for an archived assignment
    pub fn edit(&mut self, details: AssignmentDetails) -> Result<(), AssignmentError> {
        self.ensure_active()?;
        let now = Utc::now();

        self.push_status(now, UPDATED_STATUS.to_string());
        self.details = normalize(details);
        self.concurrency_stamp.regenerate();
        self.updated_at = now;
        self.events.push(AssignmentEvent::AssignmentUpdated {
            assignment_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Appends a workflow status such as a forwarding step
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::Validation` for blank text and
    /// `AssignmentError::Archived` for an archived assignment
    pub fn add_status(&mut self, status: impl Into<String>) -> Result<(), AssignmentError> {
        self.ensure_active()?;
        let status = status.into().trim().to_string();
        if status.is_empty() {
            return Err(AssignmentError::validation("status text is required"));
        }

        let now = Utc::now();
        self.push_status(now, status);
        self.concurrency_stamp.regenerate();
        self.updated_at = now;
        Ok(())
    }

    /// Archives the assignment
    ///
    /// # Errors
    ///
    /// Returns `AssignmentError::InvalidStateTransition` if already archived
    pub fn archive(&mut self) -> Result<(), AssignmentError> {
        match &self.state {
            AssignmentState::Active => {
                let now = Utc::now();
                self.state = AssignmentState::Archived { archived_at: now };
                self.concurrency_stamp.regenerate();
                self.updated_at = now;
                self.events.push(AssignmentEvent::AssignmentArchived {
                    assignment_id: self.id,
                    timestamp: now,
                });
                Ok(())
            }
            _ => Err(AssignmentError::InvalidStateTransition {
                from: format!("{:?}", self.state),
                to: "Archived".to_string(),
            }),
        }
    }

    /// Sets the soft-delete flag
    ///
    /// Returns `false` when the assignment was already deleted.
    pub fn mark_deleted(&mut self) -> bool {
        if self.is_deleted {
            return false;
        }
        let now = Utc::now();
        self.is_deleted = true;
        self.concurrency_stamp.regenerate();
        self.updated_at = now;
        self.events.push(AssignmentEvent::AssignmentDeleted {
            assignment_id: self.id,
            timestamp: now,
        });
        true
    }

    fn push_status(&mut self, at: DateTime<Utc>, status: String) {
        self.status_log.append(at, status.clone());
        self.events.push(AssignmentEvent::StatusAdded {
            assignment_id: self.id,
            status,
            timestamp: at,
        });
    }

    fn ensure_active(&self) -> Result<(), AssignmentError> {
        if self.is_archived() {
            return Err(AssignmentError::Archived(self.id.to_string()));
        }
        Ok(())
    }
}

impl Entity for Assignment {
    const KIND: &'static str = "Assignment";

    fn keys(&self) -> Vec<AtomicValue> {
        vec![self.id.into()]
    }
}

impl AggregateRoot for Assignment {
    type Id = AssignmentId;
    type Event = AssignmentEvent;

    fn id(&self) -> AssignmentId {
        self.id
    }

    fn concurrency_stamp(&self) -> &ConcurrencyStamp {
        &self.concurrency_stamp
    }

    fn pending_events(&self) -> &[AssignmentEvent] {
        &self.events
    }

    fn take_events(&mut self) -> Vec<AssignmentEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.equals_entity(other)
    }
}

impl Eq for Assignment {}

fn normalize(mut details: AssignmentDetails) -> AssignmentDetails {
    details.note = details
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> AssignmentDetails {
        AssignmentDetails {
            accept_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            department_number: 7,
            description: "Оформление инвалидности".to_string(),
            forward_date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            forward_department: "Бюро МСЭ №3".to_string(),
            department_forward_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            assignee: "Кузнецова Е.В.".to_string(),
            note: None,
        }
    }

    #[test]
    fn test_create_starts_log() {
        let assignment = Assignment::create(details(), PatientId::new());

        assert_eq!(assignment.status_log().len(), 1);
        assert_eq!(assignment.status_log().entries()[0].status, CREATED_STATUS);
        assert_eq!(assignment.status_log().entries()[0].timestamp, assignment.creation_date());
        assert_eq!(assignment.pending_events().len(), 2);
    }

    #[test]
    fn test_archive_twice_fails() {
        let mut assignment = Assignment::create(details(), PatientId::new());
        assignment.archive().unwrap();

        assert!(matches!(
            assignment.archive(),
            Err(AssignmentError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_blank_note_normalized() {
        let mut with_note = details();
        with_note.note = Some("  ".to_string());
        let assignment = Assignment::create(with_note, PatientId::new());
        assert_eq!(assignment.note(), None);
    }
}
