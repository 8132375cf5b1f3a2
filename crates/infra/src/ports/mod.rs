//! Repository ports consumed by the engine.
//!
//! Every call is async because a real adapter may block on disk or network.
//! Each single call is atomic from the caller's point of view; nothing here
//! offers a transaction spanning several calls.
//!
//! Adapters are plain row stores: they do not validate names, ranks or the
//! default-aisle rule and they never cascade. Those rules belong to the engine.

use thiserror::Error;

use shoplist_core::ShoppingError;

pub mod aisle;
pub mod aisle_product;
pub mod location;
pub mod product;

pub use aisle::AislePort;
pub use aisle_product::AisleProductPort;
pub use location::LocationPort;
pub use product::ProductPort;

/// Result type returned by every port call.
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository operation error.
///
/// These are infrastructure failures, as opposed to the engine's validation
/// errors. The engine surfaces them unchanged as [`ShoppingError::Generic`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The row addressed by an update/delete does not exist.
    #[error("row not found: {0}")]
    NotFound(String),

    /// An insert collided with an existing row id.
    #[error("row already exists: {0}")]
    Conflict(String),

    /// Storage backend failure (I/O, poisoned lock, serialization).
    #[error("storage error: {0}")]
    Storage(String),

    /// The write committed but its change notification could not be published.
    #[error("change publication failed: {0}")]
    Publish(String),
}

impl From<StoreError> for ShoppingError {
    fn from(err: StoreError) -> Self {
        ShoppingError::generic(err.to_string())
    }
}
