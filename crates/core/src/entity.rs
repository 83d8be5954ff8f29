//! Entity trait: identity that survives edits.

/// Entity marker + minimal interface.
///
/// Two entities with the same identifier are the same record, whatever their
/// other fields say. Stores use the identifier for lookup and uniqueness.
pub trait Entity {
    /// Identifier type, compared by exact equality.
    type Id: ?Sized + Eq + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
