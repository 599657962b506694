//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use rates_types::{Currency, CurrencyId, Rate, RateId, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Feature-gated imports
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
use chrono::NaiveDate;
#[cfg(not(feature = "sqlite"))]
use rust_decimal::Decimal;

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Currency row from database.
#[derive(FromRow)]
pub struct DbCurrency {
    pub id: i32,
    pub abbreviation: String,
    pub name: String,
    pub scale: i32,
}

/// Rate row from database.
///
/// SQLite keeps the date as ISO text and the rate as decimal text.
#[derive(FromRow)]
pub struct DbRate {
    pub id: i64,
    pub currency_id: i32,

    #[cfg(not(feature = "sqlite"))]
    pub rate_date: NaiveDate,
    #[cfg(feature = "sqlite")]
    pub rate_date: String,

    #[cfg(not(feature = "sqlite"))]
    pub official_rate: Decimal,
    #[cfg(feature = "sqlite")]
    pub official_rate: String,

    pub scale: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion (feature-gated implementations)
// ─────────────────────────────────────────────────────────────────────────────

impl DbCurrency {
    /// Convert database row to domain Currency.
    pub fn into_domain(self) -> Currency {
        Currency::from_parts(
            CurrencyId::new(self.id),
            self.abbreviation,
            self.name,
            self.scale,
        )
    }
}

impl DbRate {
    /// Convert database row to domain Rate.
    pub fn into_domain(self) -> Result<Rate, RepoError> {
        #[cfg(not(feature = "sqlite"))]
        let (date, official_rate) = (self.rate_date, self.official_rate);

        #[cfg(feature = "sqlite")]
        let (date, official_rate) = {
            let date = chrono::NaiveDate::parse_from_str(&self.rate_date, "%Y-%m-%d")
                .map_err(|e| RepoError::Database(e.to_string()))?;
            let official_rate = self
                .official_rate
                .parse::<rust_decimal::Decimal>()
                .map_err(|e| RepoError::Database(e.to_string()))?;
            (date, official_rate)
        };

        Ok(Rate::from_parts(
            RateId::new(self.id),
            CurrencyId::new(self.currency_id),
            date,
            official_rate,
            self.scale,
        ))
    }
}

/// Formats a date the way the SQLite schema stores it.
#[cfg(feature = "sqlite")]
pub fn date_to_text(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Maps a sqlx error, surfacing foreign-key and unique violations.
pub fn map_db_error(err: sqlx::Error) -> RepoError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return RepoError::NotFound;
        }
        if db_err.is_unique_violation() {
            return RepoError::Conflict(db_err.message().to_string());
        }
    }
    RepoError::Database(err.to_string())
}
