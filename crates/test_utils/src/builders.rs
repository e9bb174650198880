//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;

use core_kernel::{AggregateRoot, PatientId};
use domain_assignment::{Assignment, AssignmentDetails};
use domain_document::Document;
use domain_patient::{Capable, CitizenshipInfo, Patient, Pension};

use crate::fixtures::{DateFixtures, NameFixtures, PatientPartFixtures};

/// Builder for constructing test patients
pub struct TestPatientBuilder {
    full_name: String,
    birthday: NaiveDate,
    citizenship_info: CitizenshipInfo,
    capable: Option<Capable>,
    pension: Option<Pension>,
    note: Option<String>,
    documents: Vec<Document>,
}

impl Default for TestPatientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPatientBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            full_name: NameFixtures::full_name().to_string(),
            birthday: DateFixtures::birthday(),
            citizenship_info: PatientPartFixtures::citizenship(),
            capable: None,
            pension: None,
            note: None,
            documents: Vec::new(),
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = birthday;
        self
    }

    pub fn with_citizenship(mut self, info: CitizenshipInfo) -> Self {
        self.citizenship_info = info;
        self
    }

    pub fn with_capable(mut self, capable: Capable) -> Self {
        self.capable = Some(capable);
        self
    }

    pub fn with_pension(mut self, pension: Pension) -> Self {
        self.pension = Some(pension);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Adds a document stored under its own type
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Builds the patient with its events drained
    ///
    /// # Panics
    ///
    /// Panics if the configured values are rejected by the aggregate
    pub fn build(self) -> Patient {
        let mut patient = Patient::create(
            self.full_name,
            self.birthday,
            self.citizenship_info,
            self.capable,
            self.pension,
            self.note,
        )
        .expect("test patient should be valid");

        for document in self.documents {
            patient
                .assign_document(document.document_type(), document)
                .expect("test document should be accepted");
        }
        patient.take_events();
        patient
    }
}

/// Builder for constructing assignment details
pub struct TestAssignmentBuilder {
    details: AssignmentDetails,
    patient_id: PatientId,
}

impl Default for TestAssignmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAssignmentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        let accept = DateFixtures::accept_date();
        Self {
            details: AssignmentDetails {
                accept_date: accept,
                department_number: 4,
                description: "Оформление группы инвалидности".to_string(),
                forward_date: accept + chrono::Duration::days(3),
                forward_department: "Бюро МСЭ №12".to_string(),
                department_forward_date: accept + chrono::Duration::days(14),
                assignee: "Лебедева М.Ю.".to_string(),
                note: None,
            },
            patient_id: PatientId::new(),
        }
    }

    pub fn for_patient(mut self, patient_id: PatientId) -> Self {
        self.patient_id = patient_id;
        self
    }

    pub fn with_department(mut self, department_number: u32) -> Self {
        self.details.department_number = department_number;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.details.description = description.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.details.assignee = assignee.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.details.note = Some(note.into());
        self
    }

    /// The configured details without creating an assignment
    pub fn details(&self) -> AssignmentDetails {
        self.details.clone()
    }

    /// Builds the assignment with its events drained
    pub fn build(self) -> Assignment {
        let mut assignment = Assignment::create(self.details, self.patient_id);
        assignment.take_events();
        assignment
    }
}
