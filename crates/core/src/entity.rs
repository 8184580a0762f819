//! Entity trait: identity + continuity across state changes.

use crate::EntityId;

/// Entity marker + minimal interface.
///
/// Identifiers are assigned by the backend and stay stable for the
/// entity's lifetime.
pub trait Entity {
    /// Returns the entity identifier.
    fn id(&self) -> &EntityId;
}
