//! In-memory rate cache with TTL using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use rates_types::{Rate, RateCache};

/// Process-local rate cache, bounded in size, with an optional time-to-live.
///
/// Keys carry the date, so entries from past days are never read again;
/// they leave through the capacity bound or the TTL.
pub struct InMemoryRateCache {
    entries: Cache<String, Rate>,
}

impl InMemoryRateCache {
    pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

    /// Creates a cache holding at most `max_entries` rates.
    ///
    /// With `ttl` set, entries expire that long after insertion.
    pub fn new(max_entries: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::<String, Rate>::builder().max_capacity(max_entries);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            entries: builder.build(),
        }
    }
}

impl Default for InMemoryRateCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTRIES, None)
    }
}

#[async_trait]
impl RateCache for InMemoryRateCache {
    async fn get(&self, key: &str) -> Option<Rate> {
        let rate = self.entries.get(key).await;
        debug!(key, hit = rate.is_some(), "Cache lookup");
        rate
    }

    async fn put(&self, key: String, rate: Rate) {
        debug!(key = %key, "Cache PUT");
        self.entries.insert(key, rate).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rates_types::{CurrencyId, cache_key};
    use rust_decimal_macros::dec;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn usd_rate() -> Rate {
        Rate::new(CurrencyId::new(431), june(1), dec!(3.2014))
    }

    async fn held(cache: &InMemoryRateCache) -> u64 {
        cache.entries.run_pending_tasks().await;
        cache.entries.entry_count()
    }

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = InMemoryRateCache::default();
        let key = cache_key("USD", usd_rate().date);

        // Initially, cache is empty
        assert!(cache.get(&key).await.is_none());

        cache.put(key.clone(), usd_rate()).await;

        assert_eq!(cache.get(&key).await, Some(usd_rate()));
        assert!(cache.get("rateByAbbreviation:EUR:2024-06-01").await.is_none());
        assert_eq!(held(&cache).await, 1);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let cache = InMemoryRateCache::default();
        let key = cache_key("USD", usd_rate().date);

        cache.put(key.clone(), usd_rate()).await;
        let mut newer = usd_rate();
        newer.official_rate = dec!(3.3);
        cache.put(key.clone(), newer.clone()).await;

        assert_eq!(cache.get(&key).await, Some(newer));
        assert_eq!(held(&cache).await, 1);
    }

    #[tokio::test]
    async fn test_entry_within_ttl_is_a_hit() {
        let cache = InMemoryRateCache::new(100, Some(Duration::from_secs(3600)));
        let key = cache_key("USD", usd_rate().date);

        cache.put(key.clone(), usd_rate()).await;

        assert_eq!(cache.get(&key).await, Some(usd_rate()));
    }

    #[tokio::test]
    async fn test_expired_entries_of_past_days_are_reclaimed() {
        let cache = InMemoryRateCache::new(100, Some(Duration::from_millis(50)));
        for offset in 0..30 {
            let day = june(1).checked_add_days(Days::new(offset)).unwrap();
            cache.put(cache_key("USD", day), usd_rate()).await;
        }

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get(&cache_key("USD", june(30))).await.is_none());
        assert_eq!(held(&cache).await, 0);
    }

    #[tokio::test]
    async fn test_capacity_bounds_entry_count() {
        let cache = InMemoryRateCache::new(5, None);
        for offset in 0..50 {
            let day = june(1).checked_add_days(Days::new(offset)).unwrap();
            cache.put(cache_key("USD", day), usd_rate()).await;
        }

        assert!(held(&cache).await <= 5);
    }
}
