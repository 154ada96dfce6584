//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values: two
/// `Money` amounts of 1250 cents are the same amount, whereas two finance
/// entries with equal fields but different ids are different entries.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
