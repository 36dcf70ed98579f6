//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Derived results (a countdown, a freshness tier) have no identity: two
/// countdowns with the same months/weeks/days are interchangeable. They are
/// recomputed from a product snapshot instead of being mutated in place.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Countdown { months: u32, weeks: u32, days: u32, expired: bool }
///
/// impl ValueObject for Countdown {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
