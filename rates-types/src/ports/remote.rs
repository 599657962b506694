//! Remote rate source port.
//!
//! Implementations are HTTP clients for an authoritative rate service,
//! or stubs in tests.

use crate::domain::{Currency, CurrencyId, Rate};

/// Error type for remote rate source operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Port trait for the authoritative rate service.
#[async_trait::async_trait]
pub trait RemoteRateSource: Send + Sync + 'static {
    /// Fetches the current official rate of a currency.
    async fn get_rate(&self, currency_id: CurrencyId) -> Result<Rate, RemoteError>;

    /// Fetches the catalogue of currencies the source knows about.
    async fn list_currencies(&self) -> Result<Vec<Currency>, RemoteError>;
}
