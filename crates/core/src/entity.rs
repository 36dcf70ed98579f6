//! Entity trait: identity + continuity across edits.

/// Entity marker + minimal interface.
///
/// Two entities with the same id are the same thing, even if every other
/// field differs (e.g. a product before and after its name was edited).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
