//! Entity trait: identity that persists across state changes.

/// Minimal interface for domain entities.
///
/// Entities are compared by identifier; their attribute values may change
/// over time without changing *which* entity they are.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
