//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A grade of `12.5` is the same grade wherever it appears.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. Constructors are expected to validate, so holding a value
/// object means holding a value that already satisfies its invariants.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct GradeValue(f64);
///
/// impl ValueObject for GradeValue {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
