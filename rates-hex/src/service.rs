//! Rate Application Service
//!
//! Resolves exchange rates through the cache, directory and remote source
//! ports. Contains NO infrastructure logic - pure orchestration.

use chrono::{Local, NaiveDate};
use tracing::debug;

use rates_types::{
    Currency, CurrencyDirectory, DomainError, Rate, RateCache, RemoteRateSource, ResolveError,
    cache_key,
};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Application service resolving today's rate for a currency abbreviation.
///
/// Generic over the three ports - adapters are injected at compile time:
/// - `D: CurrencyDirectory` - persistent currencies and stored rates
/// - `C: RateCache` - fast lookup tier
/// - `S: RemoteRateSource` - authoritative source used on a full miss
pub struct RateResolver<D, C, S>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    directory: D,
    cache: C,
    remote: S,
    today: fn() -> NaiveDate,
}

impl<D, C, S> RateResolver<D, C, S>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    /// Creates a resolver scoped to the local calendar date.
    pub fn new(directory: D, cache: C, remote: S) -> Self {
        Self {
            directory,
            cache,
            remote,
            today: local_today,
        }
    }

    /// Replaces the source of "today" (tests pin the date with this).
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Returns a reference to the underlying directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Returns a reference to the underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns a reference to the underlying remote source.
    pub fn remote(&self) -> &S {
        &self.remote
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves today's rate for `abbreviation`.
    ///
    /// Lookup order, first match wins:
    /// 1. cache under `rateByAbbreviation:{abbreviation}:{today}`
    /// 2. the currency's stored rate dated today (written back to the cache)
    /// 3. the remote source (persisted, then written to the cache)
    ///
    /// An unknown abbreviation fails with [`DomainError::CurrencyNotFound`].
    /// Directory and remote failures are returned unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_rate(&self, abbreviation: &str) -> Result<Rate, ResolveError> {
        let today = (self.today)();
        let key = cache_key(abbreviation, today);

        if let Some(rate) = self.cache.get(&key).await {
            debug!(%key, "Rate served from cache");
            return Ok(rate);
        }

        let currency = self.find_currency(abbreviation).await?;

        if let Some(rate) = self.directory.find_rate(currency.id, today).await? {
            debug!(%key, "Rate served from directory");
            self.cache.put(key, rate.clone()).await;
            return Ok(rate);
        }

        let fetched = self.remote.get_rate(currency.id).await?;
        let stored = self.directory.save_rate(fetched).await?;
        debug!(%key, date = %stored.date, "Rate fetched from remote source and stored");
        self.cache.put(key, stored.clone()).await;

        Ok(stored)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Directory views
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a currency by abbreviation.
    pub async fn get_currency(&self, abbreviation: &str) -> Result<Currency, ResolveError> {
        self.find_currency(abbreviation).await
    }

    /// Lists all currencies in the directory.
    pub async fn list_currencies(&self) -> Result<Vec<Currency>, ResolveError> {
        Ok(self.directory.list_currencies().await?)
    }

    /// Lists the rates already stored for a currency, newest first.
    pub async fn list_rates(&self, abbreviation: &str) -> Result<Vec<Rate>, ResolveError> {
        let currency = self.find_currency(abbreviation).await?;
        Ok(self.directory.list_rates(currency.id).await?)
    }

    /// Refreshes the directory from the remote source's currency catalogue.
    ///
    /// Returns the number of currency records written.
    #[tracing::instrument(skip(self))]
    pub async fn sync_currencies(&self) -> Result<usize, ResolveError> {
        let currencies = self.remote.list_currencies().await?;
        let written = self.directory.upsert_currencies(currencies).await?;
        tracing::info!(written, "Currency directory synchronized");
        Ok(written)
    }

    async fn find_currency(&self, abbreviation: &str) -> Result<Currency, ResolveError> {
        self.directory
            .find_by_abbreviation(abbreviation)
            .await?
            .ok_or_else(|| DomainError::CurrencyNotFound(abbreviation.to_string()).into())
    }
}
