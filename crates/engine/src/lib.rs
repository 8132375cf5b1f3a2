//! Shopping-list hierarchy engine.
//!
//! Keeps `Location → Aisle → AisleProduct → Product` consistent across
//! inserts, renames, re-ordering, copying and cascading deletes. The engine
//! only talks to the repository ports in `shoplist-infra`; it holds no state of
//! its own.
//!
//! Call graph: [`AisleProductLedger`] is the leaf, [`AisleStore`] and
//! [`ProductCatalog`] use it, and [`LocationHierarchy`] composes all three.
//! [`ShoppingEngine`] wires them together.

pub mod aisle_store;
pub mod catalog;
pub mod hierarchy;
pub mod ledger;
pub mod rank;
pub mod services;

pub use aisle_store::AisleStore;
pub use catalog::ProductCatalog;
pub use hierarchy::LocationHierarchy;
pub use ledger::AisleProductLedger;
pub use services::{Ports, ShoppingEngine};
