//! Patient Aggregate Root
//!
//! The patient is the consistency boundary for everything the social
//! department records about a person. Sub-objects are replaced one at a time
//! through dedicated operations; nothing is ever deleted, patients are only
//! archived on discharge.
//!
//! # Invariants
//!
//! - Every document key maps to a document of the same type
//! - The full name is never blank and the birthday is not in the future
//! - Every effective mutation regenerates the concurrency stamp
//! - An archived patient accepts no further changes

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use core_kernel::{AggregateRoot, AtomicValue, ConcurrencyStamp, Entity, PatientId};
use domain_document::{Document, DocumentFactory, DocumentType};

use crate::capable::Capable;
use crate::citizenship::{CitizenshipInfo, CitizenshipType, EarlyRegistration};
use crate::error::PatientError;
use crate::events::{PatientEvent, PatientField};
use crate::pension::Pension;

/// A patient of the hospital, as seen by the social department
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Unique patient identifier
    id: PatientId,
    full_name: String,
    birthday: NaiveDate,
    citizenship_info: CitizenshipInfo,
    /// Legal capacity ruling, if any
    capable: Option<Capable>,
    /// Disability pension, if any
    pension: Option<Pension>,
    note: Option<String>,
    #[serde(deserialize_with = "deserialize_documents")]
    documents: BTreeMap<DocumentType, Document>,
    is_archived: bool,
    /// Token for optimistic concurrency
    concurrency_stamp: ConcurrencyStamp,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<PatientEvent>,
}

impl Patient {
    /// Registers a new patient
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if the name is blank or the
    /// birthday lies in the future
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use domain_patient::{Patient, CitizenshipInfo, CitizenshipType, EarlyRegistration};
    ///
    /// let citizenship = CitizenshipInfo::new(
    ///     CitizenshipType::RussianFederation,
    ///     "Россия",
    ///     None,
    ///     EarlyRegistration::none(),
    ///     None,
    /// );
    /// let patient = Patient::create(
    ///     "Петров Пётр Петрович",
    ///     NaiveDate::from_ymd_opt(1960, 4, 2).unwrap(),
    ///     citizenship,
    ///     None,
    ///     None,
    ///     None,
    /// ).unwrap();
    /// assert_eq!(patient.full_name(), "Петров Пётр Петрович");
    /// ```
    pub fn create(
        full_name: impl Into<String>,
        birthday: NaiveDate,
        citizenship_info: CitizenshipInfo,
        capable: Option<Capable>,
        pension: Option<Pension>,
        note: Option<String>,
    ) -> Result<Self, PatientError> {
        let full_name = validate_full_name(full_name.into())?;
        let now = Utc::now();
        if birthday > now.date_naive() {
            return Err(PatientError::validation("birthday cannot be in the future"));
        }

        let id = PatientId::new();
        Ok(Self {
            id,
            full_name: full_name.clone(),
            birthday,
            citizenship_info,
            capable,
            pension,
            note: normalize_note(note),
            documents: BTreeMap::new(),
            is_archived: false,
            concurrency_stamp: ConcurrencyStamp::new(),
            created_at: now,
            updated_at: now,
            events: vec![PatientEvent::PatientCreated {
                patient_id: id,
                full_name,
                timestamp: now,
            }],
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }

    pub fn citizenship_info(&self) -> &CitizenshipInfo {
        &self.citizenship_info
    }

    pub fn capable(&self) -> Option<&Capable> {
        self.capable.as_ref()
    }

    pub fn pension(&self) -> Option<&Pension> {
        self.pension.as_ref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn documents(&self) -> &BTreeMap<DocumentType, Document> {
        &self.documents
    }

    pub fn document(&self, document_type: DocumentType) -> Option<&Document> {
        self.documents.get(&document_type)
    }

    /// Types of held documents whose number is missing or malformed
    pub fn invalid_documents(&self) -> Vec<DocumentType> {
        self.documents
            .values()
            .filter(|document| !document.is_valid())
            .map(Document::document_type)
            .collect()
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the full name if it differs
    ///
    /// Returns whether anything changed.
    pub fn change_full_name(&mut self, full_name: impl Into<String>) -> Result<bool, PatientError> {
        self.ensure_active()?;
        let full_name = validate_full_name(full_name.into())?;
        if full_name == self.full_name {
            return Ok(false);
        }
        self.full_name = full_name;
        self.touch(PatientField::FullName);
        Ok(true)
    }

    /// Replaces the whole citizenship sub-object
    pub fn change_citizenship_info(
        &mut self,
        citizenship: CitizenshipType,
        country: impl Into<String>,
        registration: Option<String>,
        early_registration: EarlyRegistration,
        place_of_birth: Option<String>,
    ) -> Result<bool, PatientError> {
        let info = CitizenshipInfo::new(
            citizenship,
            country,
            registration,
            early_registration,
            place_of_birth,
        );
        self.set_citizenship_info(info)
    }

    /// Replaces the citizenship sub-object with a prepared value
    pub fn set_citizenship_info(&mut self, info: CitizenshipInfo) -> Result<bool, PatientError> {
        self.ensure_active()?;
        if info == self.citizenship_info {
            return Ok(false);
        }
        self.citizenship_info = info;
        self.touch(PatientField::CitizenshipInfo);
        Ok(true)
    }

    /// Replaces the capability record
    ///
    /// Once a record exists its court decision and trial date are kept; only
    /// the guardian fields of `capable` are taken. `None` clears the record.
    pub fn set_capable(&mut self, capable: Option<Capable>) -> Result<bool, PatientError> {
        self.ensure_active()?;
        let capable = match (self.capable.as_ref(), capable) {
            (Some(current), Some(edit)) => Some(current.with_guardian(
                edit.guardian().map(str::to_string),
                edit.guardian_order_appointment().map(str::to_string),
            )),
            (_, capable) => capable,
        };
        if capable == self.capable {
            return Ok(false);
        }
        self.capable = capable;
        self.touch(PatientField::Capable);
        Ok(true)
    }

    /// Changes the guardian, keeping the existing court decision and trial date
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if there is no capability record
    pub fn change_guardian(
        &mut self,
        guardian: Option<String>,
        guardian_order_appointment: Option<String>,
    ) -> Result<bool, PatientError> {
        let current = self
            .capable
            .as_ref()
            .ok_or_else(|| PatientError::validation("patient has no capability record"))?;
        let updated = current.with_guardian(guardian, guardian_order_appointment);
        self.set_capable(Some(updated))
    }

    pub fn set_pension(&mut self, pension: Option<Pension>) -> Result<bool, PatientError> {
        self.ensure_active()?;
        if pension == self.pension {
            return Ok(false);
        }
        self.pension = pension;
        self.touch(PatientField::Pension);
        Ok(true)
    }

    pub fn set_note(&mut self, note: Option<String>) -> Result<bool, PatientError> {
        self.ensure_active()?;
        let note = normalize_note(note);
        if note == self.note {
            return Ok(false);
        }
        self.note = note;
        self.touch(PatientField::Note);
        Ok(true)
    }

    /// Stores a document under `key`
    ///
    /// # Errors
    ///
    /// Returns `PatientError::DocumentTypeMismatch` if the document's own
    /// type differs from `key`
    pub fn assign_document(&mut self, key: DocumentType, document: Document) -> Result<bool, PatientError> {
        self.ensure_active()?;
        if document.document_type() != key {
            return Err(PatientError::DocumentTypeMismatch {
                key,
                actual: document.document_type(),
            });
        }
        if self.documents.get(&key) == Some(&document) {
            return Ok(false);
        }

        let is_valid = document.is_valid();
        self.documents.insert(key, document);
        self.concurrency_stamp.regenerate();
        self.updated_at = Utc::now();
        self.events.push(PatientEvent::DocumentAdded {
            patient_id: self.id,
            document_type: key,
            is_valid,
            timestamp: self.updated_at,
        });
        Ok(true)
    }

    /// Builds a document through the factory and stores it under its own type
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Document` for an unknown discriminator
    pub fn put_document(&mut self, discriminator: i32, number: Option<&str>) -> Result<bool, PatientError> {
        let document = DocumentFactory::create(discriminator, number)?;
        self.assign_document(document.document_type(), document)
    }

    pub fn remove_document(&mut self, key: DocumentType) -> Result<bool, PatientError> {
        self.ensure_active()?;
        if self.documents.remove(&key).is_none() {
            return Ok(false);
        }
        self.touch(PatientField::Documents);
        Ok(true)
    }

    /// Archives the patient on discharge
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyArchived` on a second call
    pub fn archive(&mut self) -> Result<(), PatientError> {
        if self.is_archived {
            return Err(PatientError::AlreadyArchived(self.id.to_string()));
        }
        let now = Utc::now();
        self.is_archived = true;
        self.concurrency_stamp.regenerate();
        self.updated_at = now;
        self.events.push(PatientEvent::PatientArchived {
            patient_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), PatientError> {
        if self.is_archived {
            return Err(PatientError::Archived(self.id.to_string()));
        }
        Ok(())
    }

    fn touch(&mut self, field: PatientField) {
        let now = Utc::now();
        self.concurrency_stamp.regenerate();
        self.updated_at = now;
        self.events.push(PatientEvent::PatientUpdated {
            patient_id: self.id,
            field,
            timestamp: now,
        });
    }
}

impl Entity for Patient {
    const KIND: &'static str = "Patient";

    fn keys(&self) -> Vec<AtomicValue> {
        vec![self.id.into()]
    }
}

impl AggregateRoot for Patient {
    type Id = PatientId;
    type Event = PatientEvent;

    fn id(&self) -> PatientId {
        self.id
    }

    fn concurrency_stamp(&self) -> &ConcurrencyStamp {
        &self.concurrency_stamp
    }

    fn pending_events(&self) -> &[PatientEvent] {
        &self.events
    }

    fn take_events(&mut self) -> Vec<PatientEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.equals_entity(other)
    }
}

impl Eq for Patient {}

fn validate_full_name(full_name: String) -> Result<String, PatientError> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err(PatientError::validation("full name is required"));
    }
    Ok(trimmed.to_string())
}

// Stored documents must sit under their own type, as `assign_document` enforces
fn deserialize_documents<'de, D>(deserializer: D) -> Result<BTreeMap<DocumentType, Document>, D::Error>
where
    D: Deserializer<'de>,
{
    let documents = BTreeMap::<DocumentType, Document>::deserialize(deserializer)?;
    if let Some((key, document)) = documents
        .iter()
        .find(|(key, document)| **key != document.document_type())
    {
        return Err(de::Error::custom(PatientError::DocumentTypeMismatch {
            key: *key,
            actual: document.document_type(),
        }));
    }
    Ok(documents)
}

// Blank notes are stored as no note
fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
