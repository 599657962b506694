//! Exchange rate domain model and the cache-key rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyId;

/// Store-assigned identifier of a persisted rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RateId(i64);

impl RateId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Official rate of one currency on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// `None` until the directory has stored the rate
    pub id: Option<RateId>,
    pub currency_id: CurrencyId,
    pub date: NaiveDate,
    pub official_rate: Decimal,
    /// Number of currency units `official_rate` is quoted for
    pub scale: i32,
}

impl Rate {
    /// Creates an unsaved rate quoted per single unit.
    pub fn new(currency_id: CurrencyId, date: NaiveDate, official_rate: Decimal) -> Self {
        Self {
            id: None,
            currency_id,
            date,
            official_rate,
            scale: 1,
        }
    }

    /// Sets the quotation scale.
    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = scale;
        self
    }

    /// Creates a rate with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: RateId,
        currency_id: CurrencyId,
        date: NaiveDate,
        official_rate: Decimal,
        scale: i32,
    ) -> Self {
        Self {
            id: Some(id),
            currency_id,
            date,
            official_rate,
            scale,
        }
    }
}

/// Builds the cache key for a currency abbreviation on a date.
///
/// Format is `rateByAbbreviation:{ABBREVIATION}:{YYYY-MM-DD}`; the
/// abbreviation is used verbatim.
pub fn cache_key(abbreviation: &str, date: NaiveDate) -> String {
    format!("rateByAbbreviation:{}:{}", abbreviation, date.format("%Y-%m-%d"))
}
