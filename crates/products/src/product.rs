use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shelflife_core::{DomainError, DomainResult, Entity, ProductId};

/// Label shown for products saved without a name.
pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed product";

/// Product category. Has no effect on expiration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Eyes,
    Lips,
    Face,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Eyes, Category::Lips, Category::Face];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Eyes => "eyes",
            Category::Lips => "lips",
            Category::Face => "face",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown category '{wanted}' (expected eyes, lips or face)"
                ))
            })
    }
}

/// Period after opening, in whole months. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PaoMonths(u32);

impl PaoMonths {
    /// Upper bound accepted from user input (100 years).
    pub const MAX: u32 = 1200;

    pub fn new(months: u32) -> DomainResult<Self> {
        if months == 0 {
            return Err(DomainError::validation("PAO months must be positive"));
        }
        if months > Self::MAX {
            return Err(DomainError::validation(format!(
                "PAO months must be at most {}",
                Self::MAX
            )));
        }
        Ok(Self(months))
    }

    /// Parse a free-form PAO entry.
    ///
    /// Blank input means "no PAO"; anything else must be a whole number of
    /// months in `1..=MAX`. An optional trailing `M` (as printed on the jar
    /// icon, e.g. `12M`) is accepted.
    pub fn parse(input: &str) -> DomainResult<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let digits = trimmed
            .strip_suffix(['M', 'm'])
            .unwrap_or(trimmed)
            .trim_end();
        let months: i64 = digits
            .parse()
            .map_err(|_| DomainError::validation(format!("'{trimmed}' is not a number of months")))?;
        let months = u32::try_from(months).map_err(|_| {
            DomainError::validation(format!("PAO months must be between 1 and {}", Self::MAX))
        })?;
        Self::new(months).map(Some)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PaoMonths {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PaoMonths> for u32 {
    fn from(value: PaoMonths) -> Self {
        value.0
    }
}

impl core::fmt::Display for PaoMonths {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}M", self.0)
    }
}

/// Parse a date entered by the user.
///
/// Accepts `YYYY-MM-DD` (interpreted as midnight UTC) or a full RFC 3339
/// timestamp. Blank input means "not set".
pub fn parse_date_input(input: &str) -> DomainResult<Option<DateTime<Utc>>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| {
            DomainError::validation(format!("'{trimmed}' is not a date (expected YYYY-MM-DD)"))
        })
}

/// User-editable fields of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub category: Category,
    pub pao_months: Option<PaoMonths>,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl ProductDetails {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            pao_months: None,
            expiry_date: None,
        }
    }

    pub fn with_pao_months(mut self, pao_months: PaoMonths) -> Self {
        self.pao_months = Some(pao_months);
        self
    }

    pub fn with_expiry_date(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

/// A tracked cosmetic product.
///
/// `id` and `date_added` are fixed at creation. Edits go through
/// [`Product::with_details`], which keeps both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Category,
    date_added: DateTime<Utc>,
    pao_months: Option<PaoMonths>,
    expiry_date: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(id: ProductId, details: ProductDetails, date_added: DateTime<Utc>) -> Self {
        Self {
            id,
            name: details.name.trim().to_string(),
            category: details.category,
            date_added,
            pao_months: details.pao_months,
            expiry_date: details.expiry_date,
        }
    }

    /// Replace the editable fields, keeping identity and `date_added`.
    pub fn with_details(&self, details: ProductDetails) -> Self {
        Self::new(self.id, details, self.date_added)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name for display; blank names fall back to [`DEFAULT_PRODUCT_NAME`].
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_PRODUCT_NAME
        } else {
            &self.name
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn pao_months(&self) -> Option<PaoMonths> {
        self.pao_months
    }

    pub fn expiry_date(&self) -> Option<DateTime<Utc>> {
        self.expiry_date
    }

    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.name.clone(),
            category: self.category,
            pao_months: self.pao_months,
            expiry_date: self.expiry_date,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
