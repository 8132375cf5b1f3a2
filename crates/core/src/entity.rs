//! Entity trait: identity + continuity across state changes.

use crate::id::Identifier;

/// Entity marker + minimal interface.
///
/// Repositories key their rows by [`Entity::Id`] and use [`Entity::set_id`] to
/// stamp a freshly generated id onto rows inserted with the unset id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Identifier;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Replace the identifier (used when the repository assigns one).
    fn set_id(&mut self, id: Self::Id);

    /// True when the entity has not been assigned an id yet.
    fn is_new(&self) -> bool {
        self.id().is_unset()
    }
}
