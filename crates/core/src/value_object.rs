//! Value object trait: equality by value, not identity.

/// Marker for immutable domain values compared by their attributes.
///
/// Two value objects with the same attribute values are the same value;
/// "modifying" one means constructing a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
