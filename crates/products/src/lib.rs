//! Cosmetic product model and expiration rules.
//!
//! This crate contains the pure, deterministic part of the tracker (no IO,
//! no timers, no storage): the product record, input validation, the
//! governing-expiration calculation and the countdown projection.

pub mod countdown;
pub mod expiration;
pub mod product;
pub mod summary;

pub use countdown::{Countdown, project};
pub use expiration::{
    EXPIRY_SOON_THRESHOLD_DAYS, ExpirationSource, FreshnessTier, TrackingMethod, freshness_tier,
    governing_expiration, is_expired,
};
pub use product::{Category, PaoMonths, Product, ProductDetails, parse_date_input};
pub use summary::ExpirationSummary;
