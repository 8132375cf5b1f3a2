//! Products domain module.
//!
//! The `Product` entity and its pure state transitions. Persistence and the
//! catalog's uniqueness rules live in `shoplist-engine`.

pub mod product;

pub use product::Product;
