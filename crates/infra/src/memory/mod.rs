//! In-memory repository adapter.

mod store;
mod table;

pub use store::InMemoryShoppingStore;
