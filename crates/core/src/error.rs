//! Domain error model.

use thiserror::Error;

/// Result type used across the engine.
pub type ShoppingResult<T> = Result<T, ShoppingError>;

/// Which uniqueness scope a duplicate name collided in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NameScope {
    /// Location names are unique globally.
    Location,
    /// Aisle names are unique within their location.
    Aisle,
    /// Active product names are unique globally.
    Product,
}

impl core::fmt::Display for NameScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            NameScope::Location => "location",
            NameScope::Aisle => "aisle",
            NameScope::Product => "product",
        };
        f.write_str(s)
    }
}

/// Engine-level error.
///
/// Everything except [`ShoppingError::Generic`] is a permanent precondition
/// failure detected before the mutating step ran; callers need new input to fix
/// it. `Generic` wraps an underlying repository failure and keeps its message
/// for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShoppingError {
    /// A name-uniqueness check failed.
    #[error("{scope} name must be unique: '{name}'")]
    DuplicateName { scope: NameScope, name: String },

    /// An add targeted an entity that already exists.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    /// A referenced location does not exist.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// A referenced product does not exist.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// A referenced aisle does not exist.
    #[error("invalid aisle: {0}")]
    InvalidAisle(String),

    /// The default aisle can only be removed through the default-aisle path.
    #[error("cannot delete default aisle")]
    DeleteDefaultAisle,

    /// Input failed validation (blank name, forbidden field change, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unexpected underlying failure, original message preserved.
    #[error("{0}")]
    Generic(String),
}

impl ShoppingError {
    pub fn duplicate_name(scope: NameScope, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            scope,
            name: name.into(),
        }
    }

    pub fn duplicate_entity(msg: impl Into<String>) -> Self {
        Self::DuplicateEntity(msg.into())
    }

    pub fn invalid_location(msg: impl Into<String>) -> Self {
        Self::InvalidLocation(msg.into())
    }

    pub fn invalid_product(msg: impl Into<String>) -> Self {
        Self::InvalidProduct(msg.into())
    }

    pub fn invalid_aisle(msg: impl Into<String>) -> Self {
        Self::InvalidAisle(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// True for precondition failures; false for wrapped infrastructure errors.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Generic(_))
    }
}
