//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the patient and assignment domains.
//! Everything here is deterministic except [`NameFixtures::random_full_name`].

use chrono::NaiveDate;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use domain_document::Document;
use domain_patient::{Capable, CitizenshipInfo, CitizenshipType, DisabilityGroup, EarlyRegistration, Pension, PensionPaymentMethod};

/// Fixture for dates used across the suite
pub struct DateFixtures;

impl DateFixtures {
    /// Birthday of the standard adult patient
    pub fn birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(1957, 9, 21).unwrap()
    }

    /// Date of the standard capacity ruling
    pub fn trial_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, 17).unwrap()
    }

    /// Start date of the standard pension
    pub fn pension_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    /// Date the standard assignment was accepted
    pub fn accept_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }
}

/// Fixture for patient names
pub struct NameFixtures;

impl NameFixtures {
    pub fn full_name() -> &'static str {
        "Смирнов Алексей Петрович"
    }

    /// A generated "Last First" name for tests that need many distinct patients
    pub fn random_full_name() -> String {
        let last: String = LastName().fake();
        let first: String = FirstName().fake();
        format!("{last} {first}")
    }
}

/// Fixture for document values
pub struct DocumentFixtures;

impl DocumentFixtures {
    pub fn valid_passport() -> Document {
        Document::passport("4510 123456")
    }

    pub fn invalid_passport() -> Document {
        Document::passport("45 10 123456")
    }

    pub fn valid_medical_policy() -> Document {
        Document::medical_policy("7755440011223344")
    }

    pub fn valid_snils() -> Document {
        Document::snils("112-233-445 95")
    }
}

/// Fixture for patient sub-objects
pub struct PatientPartFixtures;

impl PatientPartFixtures {
    /// Russian citizen registered in Moscow
    pub fn citizenship() -> CitizenshipInfo {
        CitizenshipInfo::new(
            CitizenshipType::RussianFederation,
            "Россия",
            Some("г. Москва, ул. Профсоюзная, 12".to_string()),
            EarlyRegistration::none(),
            Some("г. Москва".to_string()),
        )
    }

    /// Stateless person with an earlier registration
    pub fn stateless_citizenship() -> CitizenshipInfo {
        CitizenshipInfo::new(
            CitizenshipType::Stateless,
            "",
            None,
            EarlyRegistration::in_city("Калуга"),
            None,
        )
    }

    /// Capacity ruling without a guardian yet
    pub fn capable() -> Capable {
        Capable::new("Решение №2-871/2021", DateFixtures::trial_date(), None, None)
    }

    /// Capacity ruling with an appointed guardian
    pub fn capable_with_guardian() -> Capable {
        Capable::new(
            "Решение №2-871/2021",
            DateFixtures::trial_date(),
            Some("Смирнова О.А.".to_string()),
            Some("Приказ №41 от 01.06.2021".to_string()),
        )
    }

    pub fn pension() -> Pension {
        Pension::new(DisabilityGroup::Second, DateFixtures::pension_start(), PensionPaymentMethod::Department)
            .with_codes("077", "015")
            .with_reference("СФР-2018-0042")
    }
}
