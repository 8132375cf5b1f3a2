//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Two
/// value objects with the same values are the same value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Comparison key for entity names.
///
/// Names are compared trimmed and case-insensitively everywhere uniqueness is
/// checked, so `"  Milk "` and `"milk"` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A name that is empty after trimming cannot identify anything.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, other: &str) -> bool {
        *self == NameKey::new(other)
    }
}

impl ValueObject for NameKey {}

impl From<&str> for NameKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl core::fmt::Display for NameKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
