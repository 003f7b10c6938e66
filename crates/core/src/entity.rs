//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Customers, line items and generated documents are entities: two records with
/// the same id are the same thing, even if every other field differs.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
