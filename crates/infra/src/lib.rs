//! Infrastructure layer: repository ports, adapters and configuration.
//!
//! The engine only ever talks to the port traits in [`ports`]. This crate ships
//! an in-memory adapter for tests/dev and single-process use, plus a decorator
//! that publishes a change notification after every committed write.

pub mod config;
pub mod memory;
pub mod ports;
pub mod publishing;

pub use config::{EngineConfig, ShiftWindow};
pub use memory::InMemoryShoppingStore;
pub use ports::{AislePort, AisleProductPort, LocationPort, ProductPort, StoreError, StoreResult};
pub use publishing::PublishingStore;
