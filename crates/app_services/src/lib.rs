//! Application Services
//!
//! Use cases over the patient and assignment aggregates, plus the ambient
//! pieces a host process needs:
//!
//! - `config`: [`AppConfig`] from `SOCIAL_*` environment variables
//! - `telemetry`: `tracing` subscriber setup
//! - `dto`: request types validated before they reach the aggregates
//!
//! Services talk to storage and event transport only through the ports in
//! `core_kernel` and `domain_assignment`. A write that loses an optimistic
//! concurrency race is reloaded and retried up to
//! [`AppConfig::conflict_retries`] times.

pub mod config;
pub mod telemetry;
pub mod dto;
pub mod error;
pub mod patient_service;
pub mod assignment_service;
mod retry;

use std::sync::Arc;

use infra_memory::{AssignmentStore, LoggingDispatcher, PatientStore};

pub use config::AppConfig;
pub use telemetry::init_tracing;
pub use dto::{AssignmentDetailsRequest, OpenAssignmentRequest, RegisterPatientRequest};
pub use error::ServiceError;
pub use patient_service::PatientService;
pub use assignment_service::AssignmentService;

/// Both services wired to shared in-memory stores that log their events
pub fn in_memory_services(config: &AppConfig) -> (PatientService, AssignmentService) {
    let patients = Arc::new(PatientStore::new());
    let assignments = Arc::new(AssignmentStore::new());
    let dispatcher = Arc::new(LoggingDispatcher);

    let patient_service = PatientService::new(
        patients.clone(),
        assignments.clone(),
        dispatcher.clone(),
        dispatcher.clone(),
        config.conflict_retries,
    );
    let assignment_service = AssignmentService::new(assignments, patients, dispatcher, config.conflict_retries);
    (patient_service, assignment_service)
}
