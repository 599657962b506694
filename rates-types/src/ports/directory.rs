//! Currency directory port.
//!
//! This is the persistent tier of rate resolution.
//! Adapters (Postgres, SQLite) implement this trait.

use chrono::NaiveDate;

use crate::domain::{Currency, CurrencyId, Rate};
use crate::error::RepoError;

/// Persistent store of currencies and the rates recorded for them.
///
/// Each (currency, date) pair holds at most one rate.
#[async_trait::async_trait]
pub trait CurrencyDirectory: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────────

    /// Finds a currency by its abbreviation (exact match).
    async fn find_by_abbreviation(
        &self,
        abbreviation: &str,
    ) -> Result<Option<Currency>, RepoError>;

    /// Finds the stored rate of a currency for one date.
    async fn find_rate(
        &self,
        currency_id: CurrencyId,
        date: NaiveDate,
    ) -> Result<Option<Rate>, RepoError>;

    /// Persists a rate and returns its stored form (with id assigned).
    ///
    /// Saving a rate for a (currency, date) pair that already has one
    /// replaces the stored value.
    async fn save_rate(&self, rate: Rate) -> Result<Rate, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Catalogue
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all currencies, ordered by abbreviation.
    async fn list_currencies(&self) -> Result<Vec<Currency>, RepoError>;

    /// Lists stored rates of a currency, newest first.
    async fn list_rates(&self, currency_id: CurrencyId) -> Result<Vec<Rate>, RepoError>;

    /// Inserts or updates currencies by id. Returns the number written.
    async fn upsert_currencies(&self, currencies: Vec<Currency>) -> Result<usize, RepoError>;
}
