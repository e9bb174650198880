//! Request DTOs checked with `validator` before they reach the aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::PatientId;
use domain_assignment::AssignmentDetails;
use domain_patient::{CitizenshipInfo, CitizenshipType, EarlyRegistration};

/// Request to register a patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPatientRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    pub birthday: NaiveDate,
    pub citizenship: CitizenshipType,
    #[validate(length(max = 100))]
    pub country: String,
    #[validate(length(max = 300))]
    pub registration: Option<String>,
    /// City of an earlier registration; absent means none
    #[validate(length(min = 1, max = 100))]
    pub early_registration_city: Option<String>,
    #[validate(length(max = 200))]
    pub place_of_birth: Option<String>,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

impl RegisterPatientRequest {
    pub fn citizenship_info(&self) -> CitizenshipInfo {
        let early_registration = match &self.early_registration_city {
            Some(city) => EarlyRegistration::in_city(city.clone()),
            None => EarlyRegistration::none(),
        };
        CitizenshipInfo::new(
            self.citizenship,
            self.country.clone(),
            self.registration.clone(),
            early_registration,
            self.place_of_birth.clone(),
        )
    }
}

/// Editable assignment fields, shared by open and edit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignmentDetailsRequest {
    pub accept_date: NaiveDate,
    #[validate(range(min = 1))]
    pub department_number: u32,
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    pub forward_date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub forward_department: String,
    pub department_forward_date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub assignee: String,
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

impl From<AssignmentDetailsRequest> for AssignmentDetails {
    fn from(request: AssignmentDetailsRequest) -> Self {
        AssignmentDetails {
            accept_date: request.accept_date,
            department_number: request.department_number,
            description: request.description,
            forward_date: request.forward_date,
            forward_department: request.forward_department,
            department_forward_date: request.department_forward_date,
            assignee: request.assignee,
            note: request.note,
        }
    }
}

/// Request to open an assignment for a patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenAssignmentRequest {
    pub patient_id: PatientId,
    #[validate(nested)]
    pub details: AssignmentDetailsRequest,
}
