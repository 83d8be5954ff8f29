//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity of its own. Two line items with the same
/// product name, quantity and price are interchangeable, while two invoices
/// are told apart by their code (see [`crate::Entity`]).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Amount(u64);
///
/// impl ValueObject for Amount {}
///
/// assert_eq!(Amount(100), Amount(100));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
