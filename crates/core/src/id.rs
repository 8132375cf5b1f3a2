//! Strongly-typed identifiers used across the hierarchy.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ShoppingError;

/// Common behaviour of entity identifiers.
///
/// The nil UUID is reserved as the "unset" id: an entity carrying it has not
/// been persisted yet and the repository assigns a fresh id on insert.
pub trait Identifier: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync {
    /// Generate a fresh identifier.
    fn generate() -> Self;

    /// The "not yet assigned" identifier.
    fn unset() -> Self;

    fn is_unset(&self) -> bool;
}

/// Identifier of a location (home or shop).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Uuid);

/// Identifier of an aisle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AisleId(Uuid);

/// Identifier of an aisle membership row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AisleProductId(Uuid);

/// Identifier of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            /// Defaults to the unset id.
            fn default() -> Self {
                Self(Uuid::nil())
            }
        }

        impl Identifier for $t {
            fn generate() -> Self {
                Self::new()
            }

            fn unset() -> Self {
                Self(Uuid::nil())
            }

            fn is_unset(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = ShoppingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| ShoppingError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(LocationId, "LocationId");
impl_uuid_newtype!(AisleId, "AisleId");
impl_uuid_newtype!(AisleProductId, "AisleProductId");
impl_uuid_newtype!(ProductId, "ProductId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_id_is_unset() {
        assert!(ProductId::default().is_unset());
        assert!(AisleId::unset().is_unset());
        assert!(!LocationId::generate().is_unset());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<AisleProductId>().unwrap_err();
        match err {
            ShoppingError::Validation(msg) => assert!(msg.starts_with("AisleProductId")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let id = LocationId::new();
        let parsed: LocationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
