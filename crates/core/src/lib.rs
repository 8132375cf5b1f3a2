//! `shoplist-core`: shared building blocks for the shopping-list hierarchy.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy, the entity trait and name value objects.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{NameScope, ShoppingError, ShoppingResult};
pub use id::{AisleId, AisleProductId, Identifier, LocationId, ProductId};
pub use value_object::{NameKey, ValueObject};
