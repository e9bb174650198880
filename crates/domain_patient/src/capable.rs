//! Legal capacity and guardianship

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::impl_value_semantics;
use core_kernel::{AtomicValue, HashCache, ValueObject};

/// Court ruling on a patient's legal capacity, with the appointed guardian
///
/// The court decision and trial date describe the original ruling. Guardian
/// changes go through [`Capable::with_guardian`], which carries both forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capable {
    court_decision: String,
    trial_date: NaiveDate,
    guardian: Option<String>,
    guardian_order_appointment: Option<String>,
    #[serde(skip)]
    hash: HashCache,
}

impl Capable {
    pub fn new(
        court_decision: impl Into<String>,
        trial_date: NaiveDate,
        guardian: Option<String>,
        guardian_order_appointment: Option<String>,
    ) -> Self {
        Self {
            court_decision: court_decision.into(),
            trial_date,
            guardian,
            guardian_order_appointment,
            hash: HashCache::new(),
        }
    }

    pub fn court_decision(&self) -> &str {
        &self.court_decision
    }

    pub fn trial_date(&self) -> NaiveDate {
        self.trial_date
    }

    pub fn guardian(&self) -> Option<&str> {
        self.guardian.as_deref()
    }

    pub fn guardian_order_appointment(&self) -> Option<&str> {
        self.guardian_order_appointment.as_deref()
    }

    /// Same ruling with a different guardian and appointment order
    pub fn with_guardian(&self, guardian: Option<String>, guardian_order_appointment: Option<String>) -> Self {
        Self::new(
            self.court_decision.clone(),
            self.trial_date,
            guardian,
            guardian_order_appointment,
        )
    }
}

impl ValueObject for Capable {
    fn type_name(&self) -> &'static str {
        "Capable"
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        vec![
            self.court_decision.as_str().into(),
            self.trial_date.into(),
            self.guardian.as_deref().into(),
            self.guardian_order_appointment.as_deref().into(),
        ]
    }

    fn hash_cache(&self) -> Option<&HashCache> {
        Some(&self.hash)
    }
}

impl_value_semantics!(Capable);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_guardian_keeps_ruling() {
        let trial = NaiveDate::from_ymd_opt(2020, 3, 14).unwrap();
        let original = Capable::new("Решение №2-114/2020", trial, None, None);

        let updated = original.with_guardian(
            Some("Иванова А.П.".to_string()),
            Some("Приказ №15".to_string()),
        );

        assert_eq!(updated.court_decision(), "Решение №2-114/2020");
        assert_eq!(updated.trial_date(), trial);
        assert_eq!(updated.guardian(), Some("Иванова А.П."));
        assert_ne!(updated, original);
    }
}
