//! Months/weeks/days countdown to a governing expiration.
//!
//! Months are whole calendar months (variable length), the remainder is
//! split into weeks and days. There is no fixed 30-day approximation.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::ValueObject;

use crate::expiration::add_months;

/// Remaining time until expiration, as shown on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown {
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub expired: bool,
}

impl Countdown {
    /// Terminal state: zero everywhere, expired.
    pub const EXPIRED: Countdown = Countdown {
        months: 0,
        weeks: 0,
        days: 0,
        expired: true,
    };

    /// Total remaining days after whole months are taken out.
    pub fn remainder_days(&self) -> u32 {
        self.weeks * 7 + self.days
    }

    /// Human-readable form, e.g. `"3 months, 2 weeks, 1 day"`.
    ///
    /// Zero components are omitted. A live countdown with nothing but hours
    /// left reads `"less than a day"`.
    pub fn description(&self) -> String {
        if self.expired {
            return "expired".to_string();
        }

        let parts: Vec<String> = [(self.months, "month"), (self.weeks, "week"), (self.days, "day")]
            .into_iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, unit)| format!("{n} {unit}{}", if n == 1 { "" } else { "s" }))
            .collect();

        if parts.is_empty() {
            "less than a day".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl core::fmt::Display for Countdown {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.description())
    }
}

impl ValueObject for Countdown {}

/// Largest `m` such that `from + m months <= to`. Zero when `to <= from`.
pub fn whole_calendar_months(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    if to <= from {
        return 0;
    }

    // The month-field difference is an upper bound: one more month would land
    // in a later calendar month than `to`.
    let span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut months = u32::try_from(span).unwrap_or(0);

    while months > 0 {
        match add_months(from, months) {
            Some(anchor) if anchor <= to => break,
            _ => months -= 1,
        }
    }
    months
}

/// Project the countdown for `governing` as seen at `now`.
///
/// Pure: the same inputs always produce the same output.
pub fn project(governing: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Countdown {
    let governing = match governing {
        Some(at) if at > now => at,
        _ => return Countdown::EXPIRED,
    };

    let months = whole_calendar_months(now, governing);
    let anchor = add_months(now, months).unwrap_or(now);
    let remaining_days = (governing - anchor).num_days().max(0);
    let remaining_days = u32::try_from(remaining_days).unwrap_or(u32::MAX);

    Countdown {
        months,
        weeks: remaining_days / 7,
        days: remaining_days % 7,
        expired: false,
    }
}
