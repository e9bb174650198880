//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating documents and patient
//! sub-objects, valid and otherwise.

use chrono::NaiveDate;
use proptest::prelude::*;

use domain_document::{Document, DocumentType};
use domain_patient::{Capable, DisabilityGroup, Pension, PensionPaymentMethod};

/// Strategy for every known document type
pub fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    prop_oneof![
        Just(DocumentType::Passport),
        Just(DocumentType::MedicalPolicy),
        Just(DocumentType::Snils),
    ]
}

/// Strategy for numbers that match the given type's format
pub fn valid_number_strategy(document_type: DocumentType) -> BoxedStrategy<String> {
    match document_type {
        DocumentType::Passport => "[0-9]{4} [0-9]{6}".boxed(),
        DocumentType::MedicalPolicy => "[0-9]{16}".boxed(),
        DocumentType::Snils => "[0-9]{3}-[0-9]{3}-[0-9]{3} [0-9]{2}".boxed(),
    }
}

/// Strategy for well-formed documents of any type
pub fn valid_document_strategy() -> impl Strategy<Value = Document> {
    document_type_strategy().prop_flat_map(|document_type| {
        valid_number_strategy(document_type)
            .prop_map(move |number| Document::new(document_type, Some(&number)))
    })
}

/// Strategy for documents whose number may be missing or malformed
pub fn any_document_strategy() -> impl Strategy<Value = Document> {
    (
        document_type_strategy(),
        proptest::option::of("[0-9 -]{0,18}"),
    )
        .prop_map(|(document_type, number)| Document::new(document_type, number.as_deref()))
}

/// Strategy for dates between 1920 and 2020
pub fn past_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1920i32..2020, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Strategy for capacity rulings with an optional guardian
pub fn capable_strategy() -> impl Strategy<Value = Capable> {
    (
        "Решение №[0-9]{1,4}/20[0-9]{2}",
        past_date_strategy(),
        proptest::option::of("[А-Я][а-я]{2,10} [А-Я]\\.[А-Я]\\."),
    )
        .prop_map(|(decision, trial_date, guardian)| {
            let order = guardian.as_ref().map(|_| "Приказ №1".to_string());
            Capable::new(decision, trial_date, guardian, order)
        })
}

/// Strategy for pensions
pub fn pension_strategy() -> impl Strategy<Value = Pension> {
    (
        prop_oneof![
            Just(DisabilityGroup::First),
            Just(DisabilityGroup::Second),
            Just(DisabilityGroup::Third),
            Just(DisabilityGroup::Child),
        ],
        past_date_strategy(),
        prop_oneof![
            Just(PensionPaymentMethod::Post),
            Just(PensionPaymentMethod::Bank),
            Just(PensionPaymentMethod::Department),
        ],
    )
        .prop_map(|(group, start, method)| Pension::new(group, start, method))
}
