//! Disability pension details

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::impl_value_semantics;
use core_kernel::{AtomicValue, HashCache, ValueObject};

/// Disability group assigned by medical-social expertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisabilityGroup {
    First = 1,
    Second = 2,
    Third = 3,
    /// Disabled since childhood
    Child = 4,
}

/// How the pension is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PensionPaymentMethod {
    /// Post office delivery
    Post = 0,
    /// Transfer to a bank account
    Bank = 1,
    /// Paid out at the hospital through the department
    Department = 2,
}

/// Pension sub-object of a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pension {
    disability_group: DisabilityGroup,
    pension_start_date: NaiveDate,
    payment_method: PensionPaymentMethod,
    branch_code: Option<String>,
    department_code: Option<String>,
    social_security_reference: Option<String>,
    #[serde(skip)]
    hash: HashCache,
}

impl Pension {
    pub fn new(
        disability_group: DisabilityGroup,
        pension_start_date: NaiveDate,
        payment_method: PensionPaymentMethod,
    ) -> Self {
        Self {
            disability_group,
            pension_start_date,
            payment_method,
            branch_code: None,
            department_code: None,
            social_security_reference: None,
            hash: HashCache::new(),
        }
    }

    /// Sets the social fund branch and department codes
    pub fn with_codes(mut self, branch_code: impl Into<String>, department_code: impl Into<String>) -> Self {
        self.branch_code = Some(branch_code.into());
        self.department_code = Some(department_code.into());
        self.hash = HashCache::new();
        self
    }

    /// Sets the social-security reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.social_security_reference = Some(reference.into());
        self.hash = HashCache::new();
        self
    }

    pub fn disability_group(&self) -> DisabilityGroup {
        self.disability_group
    }

    pub fn pension_start_date(&self) -> NaiveDate {
        self.pension_start_date
    }

    pub fn payment_method(&self) -> PensionPaymentMethod {
        self.payment_method
    }

    pub fn branch_code(&self) -> Option<&str> {
        self.branch_code.as_deref()
    }

    pub fn department_code(&self) -> Option<&str> {
        self.department_code.as_deref()
    }

    pub fn social_security_reference(&self) -> Option<&str> {
        self.social_security_reference.as_deref()
    }
}

impl ValueObject for Pension {
    fn type_name(&self) -> &'static str {
        "Pension"
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        vec![
            (self.disability_group as i32).into(),
            self.pension_start_date.into(),
            (self.payment_method as i32).into(),
            self.branch_code.as_deref().into(),
            self.department_code.as_deref().into(),
            self.social_security_reference.as_deref().into(),
        ]
    }

    fn hash_cache(&self) -> Option<&HashCache> {
        Some(&self.hash)
    }
}

impl_value_semantics!(Pension);
