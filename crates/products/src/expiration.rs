//! Governing expiration and freshness classification.
//!
//! A product can carry two independent limits: a fixed expiry date and a
//! period-after-opening counted from `date_added`. Whichever comes first
//! governs. All functions here are total and side-effect free.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::ValueObject;

use crate::product::Product;

/// Products expiring within this many calendar days are flagged "expiry soon".
pub const EXPIRY_SOON_THRESHOLD_DAYS: i64 = 90;

/// Three-level freshness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessTier {
    Fresh,
    ExpirySoon,
    Expired,
}

impl FreshnessTier {
    /// Badge text shown next to the product.
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessTier::Fresh => "FRESH",
            FreshnessTier::ExpirySoon => "EXPIRY SOON",
            FreshnessTier::Expired => "EXPIRED",
        }
    }
}

impl core::fmt::Display for FreshnessTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl ValueObject for FreshnessTier {}

/// Which recorded limit produced the governing expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationSource {
    ExpiryDate,
    PeriodAfterOpening,
}

/// Which limits a product has recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMethod {
    Untracked,
    ExpiryDate,
    PeriodAfterOpening,
    Both,
}

impl TrackingMethod {
    pub fn of(product: &Product) -> Self {
        match (product.expiry_date().is_some(), product.pao_months().is_some()) {
            (false, false) => TrackingMethod::Untracked,
            (true, false) => TrackingMethod::ExpiryDate,
            (false, true) => TrackingMethod::PeriodAfterOpening,
            (true, true) => TrackingMethod::Both,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrackingMethod::Untracked => "no tracking method set",
            TrackingMethod::ExpiryDate => "expiry date",
            TrackingMethod::PeriodAfterOpening => "period after opening",
            TrackingMethod::Both => "expiry date and period after opening",
        }
    }
}

/// `instant + months` in calendar months.
///
/// Day-of-month is clamped to the target month's length (Jan 31 + 1 month is
/// Feb 28 or 29). Returns `None` when the result falls outside chrono's range.
pub fn add_months(instant: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    instant.checked_add_months(Months::new(months))
}

/// `date_added + pao_months`, if the product has a PAO.
pub fn pao_limit(product: &Product) -> Option<DateTime<Utc>> {
    let months = product.pao_months()?;
    add_months(product.date_added(), months.get())
}

/// Governing expiration together with the limit that produced it.
///
/// When both limits fall on the same instant the expiry date is reported.
pub fn governing_expiration_with_source(
    product: &Product,
) -> Option<(DateTime<Utc>, ExpirationSource)> {
    let mut candidate = product
        .expiry_date()
        .map(|at| (at, ExpirationSource::ExpiryDate));

    if let Some(limit) = pao_limit(product) {
        match candidate {
            Some((current, _)) if current <= limit => {}
            _ => candidate = Some((limit, ExpirationSource::PeriodAfterOpening)),
        }
    }

    candidate
}

/// The earliest of the product's recorded limits, or `None` if it has none.
pub fn governing_expiration(product: &Product) -> Option<DateTime<Utc>> {
    governing_expiration_with_source(product).map(|(at, _)| at)
}

/// Whole calendar days from `now` to `instant`, counted between UTC midnights.
///
/// Negative when `instant` is on an earlier day.
pub fn days_until(now: DateTime<Utc>, instant: DateTime<Utc>) -> i64 {
    (instant.date_naive() - now.date_naive()).num_days()
}

/// True iff the product has a governing expiration strictly before `now`.
pub fn is_expired(product: &Product, now: DateTime<Utc>) -> bool {
    governing_expiration(product).is_some_and(|at| at < now)
}

/// Tier for an already-computed governing expiration.
pub fn tier_for(governing: Option<DateTime<Utc>>, now: DateTime<Utc>) -> FreshnessTier {
    match governing {
        None => FreshnessTier::Fresh,
        Some(at) if at < now => FreshnessTier::Expired,
        Some(at) if days_until(now, at) <= EXPIRY_SOON_THRESHOLD_DAYS => FreshnessTier::ExpirySoon,
        Some(_) => FreshnessTier::Fresh,
    }
}

pub fn freshness_tier(product: &Product, now: DateTime<Utc>) -> FreshnessTier {
    tier_for(governing_expiration(product), now)
}
