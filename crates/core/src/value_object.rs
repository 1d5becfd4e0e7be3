//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two instances
/// with the same attribute values are the same value. [`crate::Money`] is the
/// canonical example: `2500 FC` equals `2500 FC` no matter where either came
/// from. To "modify" a value object, construct a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
