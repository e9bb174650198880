//! Structural equality, ordering and hashing for value objects
//!
//! A value object is compared by the ordered sequence of its atomic values,
//! never by address. Implementors list their significant fields once in
//! [`ValueObject::atomic_values`] and derive the comparison traits with
//! [`impl_value_semantics!`](crate::impl_value_semantics).
//!
//! # Resolution of wrappers
//!
//! Storage and test layers sometimes hand out a value wrapped in a
//! transparent decoration ([`Tracked`] is the one shipped here). Every
//! comparison first walks [`ValueObject::proxied`] down to the real variant,
//! so a wrapped and an unwrapped value with the same atomic values are equal.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::value_object::{AtomicValue, HashCache, ValueObject};
//! use core_kernel::impl_value_semantics;
//!
//! #[derive(Debug, Clone)]
//! struct Ward {
//!     building: String,
//!     number: i64,
//!     hash: HashCache,
//! }
//!
//! impl ValueObject for Ward {
//!     fn type_name(&self) -> &'static str {
//!         "Ward"
//!     }
//!
//!     fn atomic_values(&self) -> Vec<AtomicValue> {
//!         vec![self.building.as_str().into(), self.number.into()]
//!     }
//!
//!     fn hash_cache(&self) -> Option<&HashCache> {
//!         Some(&self.hash)
//!     }
//! }
//!
//! impl_value_semantics!(Ward);
//!
//! let a = Ward { building: "A".into(), number: 3, hash: HashCache::new() };
//! let b = Ward { building: "A".into(), number: 4, hash: HashCache::new() };
//! assert!(a < b);
//! ```

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A primitive, totally ordered component of a value object or entity key
///
/// `Null` sorts before every other value, so an absent optional field orders
/// ahead of a present one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtomicValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicValue::Null => write!(f, "null"),
            AtomicValue::Bool(value) => write!(f, "{}", value),
            AtomicValue::Int(value) => write!(f, "{}", value),
            AtomicValue::Text(value) => write!(f, "{}", value),
            AtomicValue::Date(value) => write!(f, "{}", value),
            AtomicValue::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            AtomicValue::Uuid(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for AtomicValue {
    fn from(value: bool) -> Self {
        AtomicValue::Bool(value)
    }
}

impl From<i64> for AtomicValue {
    fn from(value: i64) -> Self {
        AtomicValue::Int(value)
    }
}

impl From<i32> for AtomicValue {
    fn from(value: i32) -> Self {
        AtomicValue::Int(i64::from(value))
    }
}

impl From<u32> for AtomicValue {
    fn from(value: u32) -> Self {
        AtomicValue::Int(i64::from(value))
    }
}

impl From<&str> for AtomicValue {
    fn from(value: &str) -> Self {
        AtomicValue::Text(value.to_string())
    }
}

impl From<String> for AtomicValue {
    fn from(value: String) -> Self {
        AtomicValue::Text(value)
    }
}

impl From<NaiveDate> for AtomicValue {
    fn from(value: NaiveDate) -> Self {
        AtomicValue::Date(value)
    }
}

impl From<DateTime<Utc>> for AtomicValue {
    fn from(value: DateTime<Utc>) -> Self {
        AtomicValue::Timestamp(value)
    }
}

impl From<Uuid> for AtomicValue {
    fn from(value: Uuid) -> Self {
        AtomicValue::Uuid(value)
    }
}

impl<T: Into<AtomicValue>> From<Option<T>> for AtomicValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AtomicValue::Null, Into::into)
    }
}

/// Memoized structural hash
///
/// Filled on first use and never invalidated: value objects have no setters,
/// so their atomic values cannot change after construction.
#[derive(Debug, Clone, Default)]
pub struct HashCache(OnceCell<u64>);

impl HashCache {
    pub fn new() -> Self {
        Self(OnceCell::new())
    }

    /// Returns the cached hash, computing it with `compute` on first access
    pub fn get_or_compute(&self, compute: impl FnOnce() -> u64) -> u64 {
        *self.0.get_or_init(compute)
    }

    /// Returns the cached hash if it has been computed
    pub fn get(&self) -> Option<u64> {
        self.0.get().copied()
    }
}

/// An immutable object compared by its components
pub trait ValueObject: fmt::Debug {
    /// Stable name of the concrete variant
    ///
    /// Values whose real variants differ are never equal and order by this name.
    fn type_name(&self) -> &'static str;

    /// The significant fields, in declared order
    fn atomic_values(&self) -> Vec<AtomicValue>;

    /// The wrapped value when `self` is a transparent decoration
    fn proxied(&self) -> Option<&dyn ValueObject> {
        None
    }

    /// Storage for the memoized hash, if the type keeps one
    fn hash_cache(&self) -> Option<&HashCache> {
        None
    }
}

/// Strips every transparent wrapper and returns the real value
pub fn resolve(value: &dyn ValueObject) -> &dyn ValueObject {
    let mut current = value;
    while let Some(inner) = current.proxied() {
        current = inner;
    }
    current
}

/// Structural equality across any two value objects
pub fn value_eq(left: &dyn ValueObject, right: &dyn ValueObject) -> bool {
    let left = resolve(left);
    let right = resolve(right);

    if left.type_name() != right.type_name() {
        return false;
    }

    // Two already-computed hashes that differ settle it without walking the values
    let cached = (
        left.hash_cache().and_then(HashCache::get),
        right.hash_cache().and_then(HashCache::get),
    );
    if let (Some(l), Some(r)) = cached {
        if l != r {
            return false;
        }
    }

    left.atomic_values() == right.atomic_values()
}

/// Total order across any two value objects
///
/// Same variant: atomic values pairwise in declared order, first mismatch
/// decides, a shorter sequence sorts first. Different variants: by type name.
pub fn value_cmp(left: &dyn ValueObject, right: &dyn ValueObject) -> Ordering {
    let left = resolve(left);
    let right = resolve(right);

    match left.type_name().cmp(right.type_name()) {
        Ordering::Equal => left.atomic_values().cmp(&right.atomic_values()),
        other => other,
    }
}

/// Structural hash, memoized on the real value when it carries a [`HashCache`]
pub fn structural_hash(value: &dyn ValueObject) -> u64 {
    let real = resolve(value);
    match real.hash_cache() {
        Some(cache) => cache.get_or_compute(|| compute_hash(real)),
        None => compute_hash(real),
    }
}

fn compute_hash(value: &dyn ValueObject) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.type_name().hash(&mut hasher);
    value.atomic_values().hash(&mut hasher);
    hasher.finish()
}

/// Implements `PartialEq`, `Eq`, `Hash`, `PartialOrd` and `Ord` for value
/// objects in terms of their atomic values
#[macro_export]
macro_rules! impl_value_semantics {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::std::cmp::PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    $crate::value_object::value_eq(self, other)
                }
            }

            impl ::std::cmp::Eq for $ty {}

            impl ::std::hash::Hash for $ty {
                fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                    state.write_u64($crate::value_object::structural_hash(self));
                }
            }

            impl ::std::cmp::PartialOrd for $ty {
                fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                    Some(::std::cmp::Ord::cmp(self, other))
                }
            }

            impl ::std::cmp::Ord for $ty {
                fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                    $crate::value_object::value_cmp(self, other)
                }
            }
        )+
    };
}

/// A value as handed out by a storage layer, with load metadata attached
///
/// The metadata never takes part in equality, ordering or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracked<T> {
    inner: T,
    source: Option<String>,
    loaded_at: DateTime<Utc>,
}

impl<T: ValueObject> Tracked<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Wraps a value loaded from the named source
    pub fn loaded_from(inner: T, source: impl Into<String>) -> Self {
        Self {
            inner,
            source: Some(source.into()),
            loaded_at: Utc::now(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl<T: ValueObject> ValueObject for Tracked<T> {
    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    fn atomic_values(&self) -> Vec<AtomicValue> {
        self.inner.atomic_values()
    }

    fn proxied(&self) -> Option<&dyn ValueObject> {
        Some(&self.inner as &dyn ValueObject)
    }
}

impl<T: ValueObject> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        value_eq(self, other)
    }
}

impl<T: ValueObject> Eq for Tracked<T> {}

impl<T: ValueObject> Hash for Tracked<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(structural_hash(self));
    }
}

impl<T: ValueObject> PartialOrd for Tracked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ValueObject> Ord for Tracked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        value_cmp(self, other)
    }
}
