//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values.
/// Analytics snapshots and exchange-rate quotes are value objects: a snapshot
/// is a frozen projection of an invoice, and "updating" one means building a
/// new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
