//! Rate cache port.

use crate::domain::Rate;

/// Fast lookup tier in front of the directory.
///
/// Lifetime and capacity of entries are up to the implementation. Cache
/// access never fails: an unusable cache behaves like a miss.
#[async_trait::async_trait]
pub trait RateCache: Send + Sync + 'static {
    /// Returns the rate stored under `key`, if any.
    async fn get(&self, key: &str) -> Option<Rate>;

    /// Stores `rate` under `key`, replacing any previous value.
    async fn put(&self, key: String, rate: Rate);
}
