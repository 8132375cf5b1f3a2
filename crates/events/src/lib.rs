//! Change notification for the shopping-list hierarchy.
//!
//! The engine itself is pull-based. Callers that want to react to hierarchy
//! changes subscribe to an [`EventBus`] that a publishing repository decorator
//! feeds with one [`StoreChange`] per committed write.

pub mod bus;
pub mod change;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use change::{ChangeKind, EntityKind, StoreChange};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
