//! Data Transfer Objects (DTOs) for responses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Currency, CurrencyId, Rate};

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A resolved or stored exchange rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    /// Currency abbreviation
    #[schema(example = "USD")]
    pub abbreviation: String,
    pub currency_id: CurrencyId,
    /// Effective date (ISO-8601)
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    /// Official rate for `scale` units, as a decimal string
    #[schema(value_type = String, example = "3.2014")]
    pub official_rate: Decimal,
    #[schema(example = 1)]
    pub scale: i32,
}

impl RateResponse {
    pub fn from_rate(abbreviation: impl Into<String>, rate: Rate) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            currency_id: rate.currency_id,
            date: rate.date,
            official_rate: rate.official_rate,
            scale: rate.scale,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A currency from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyResponse {
    pub id: CurrencyId,
    #[schema(example = "USD")]
    pub abbreviation: String,
    #[schema(example = "US Dollar")]
    pub name: String,
    #[schema(example = 1)]
    pub scale: i32,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            id: currency.id,
            abbreviation: currency.abbreviation,
            name: currency.name,
            scale: currency.scale,
        }
    }
}

/// Result of refreshing the directory from the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    /// Number of currency records written
    #[schema(example = 27)]
    pub synced: usize,
}
