//! Citizenship and registration details

use serde::{Deserialize, Serialize};

use core_kernel::impl_value_semantics;
use core_kernel::{AtomicValue, HashCache, ValueObject};

/// Citizenship status of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CitizenshipType {
    /// Citizen of the Russian Federation
    RussianFederation = 0,
    /// Citizen of another country
    Foreign = 1,
    /// No citizenship
    Stateless = 2,
}

impl CitizenshipType {
    pub fn display_name(self) -> &'static str {
        match self {
            CitizenshipType::RussianFederation => "РФ",
            CitizenshipType::Foreign => "Иностранный гражданин",
            CitizenshipType::Stateless => "Лицо без гражданства",
        }
    }
}

/// Registration made before the current one ("early registration")
///
/// `registered == false` means no earlier registration; the city is only
/// meaningful when `registered` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarlyRegistration {
    registered: bool,
    city: Option<String>,
    #[serde(skip)]
    hash: HashCache,
}

impl EarlyRegistration {
    /// No earlier registration
    pub fn none() -> Self {
        Self::default()
    }

    /// Earlier registration in the given city
    pub fn in_city(city: impl Into<String>) -> Self {
        Self {
            registered: true,
            city: Some(city.into()),
            hash: HashCache::new(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}

impl ValueObject for EarlyRegistration {
    fn type_name(&self) -> &'static str {
        "EarlyRegistration"
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        vec![self.registered.into(), self.city.as_deref().into()]
    }

    fn hash_cache(&self) -> Option<&HashCache> {
        Some(&self.hash)
    }
}

/// Citizenship sub-object of a patient, replaced as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenshipInfo {
    citizenship: CitizenshipType,
    country: String,
    registration: Option<String>,
    early_registration: EarlyRegistration,
    place_of_birth: Option<String>,
    #[serde(skip)]
    hash: HashCache,
}

impl CitizenshipInfo {
    pub fn new(
        citizenship: CitizenshipType,
        country: impl Into<String>,
        registration: Option<String>,
        early_registration: EarlyRegistration,
        place_of_birth: Option<String>,
    ) -> Self {
        Self {
            citizenship,
            country: country.into(),
            registration,
            early_registration,
            place_of_birth,
            hash: HashCache::new(),
        }
    }

    pub fn citizenship(&self) -> CitizenshipType {
        self.citizenship
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn registration(&self) -> Option<&str> {
        self.registration.as_deref()
    }

    pub fn early_registration(&self) -> &EarlyRegistration {
        &self.early_registration
    }

    pub fn place_of_birth(&self) -> Option<&str> {
        self.place_of_birth.as_deref()
    }
}

impl ValueObject for CitizenshipInfo {
    fn type_name(&self) -> &'static str {
        "CitizenshipInfo"
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        let mut values = vec![
            (self.citizenship as i32).into(),
            self.country.as_str().into(),
            self.registration.as_deref().into(),
        ];
        values.extend(self.early_registration.atomic_values());
        values.push(self.place_of_birth.as_deref().into());
        values
    }

    fn hash_cache(&self) -> Option<&HashCache> {
        Some(&self.hash)
    }
}

impl_value_semantics!(EarlyRegistration, CitizenshipInfo);
