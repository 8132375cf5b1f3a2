//! Locations domain module.
//!
//! Locations (home and shops), their aisles and the aisle membership rows that
//! place products on a shopping list, plus the nested snapshots repositories
//! return for cascade operations.

pub mod aisle;
pub mod location;

pub use aisle::{Aisle, AisleEntry, AisleProduct, AisleWithProducts};
pub use location::{FilterType, Location, LocationKind, LocationWithAisles};
