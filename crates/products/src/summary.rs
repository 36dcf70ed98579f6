//! Everything a product card or detail view needs, computed in one pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::{self, Countdown};
use crate::expiration::{self, ExpirationSource, FreshnessTier, TrackingMethod};
use crate::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub governing_expiration: Option<DateTime<Utc>>,
    pub governing_source: Option<ExpirationSource>,
    pub tracking_method: TrackingMethod,
    pub tier: FreshnessTier,
    pub countdown: Countdown,
}

impl ExpirationSummary {
    pub fn evaluate(product: &Product, now: DateTime<Utc>) -> Self {
        let governing = expiration::governing_expiration_with_source(product);
        let governing_expiration = governing.map(|(at, _)| at);

        Self {
            governing_expiration,
            governing_source: governing.map(|(_, source)| source),
            tracking_method: TrackingMethod::of(product),
            tier: expiration::tier_for(governing_expiration, now),
            countdown: countdown::project(governing_expiration, now),
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.governing_expiration.is_some()
    }

    /// Countdown text, or an explicit note for untracked products.
    pub fn status_text(&self) -> String {
        if self.is_tracked() {
            self.countdown.description()
        } else {
            self.tracking_method.description().to_string()
        }
    }
}
