//! # Rates Client SDK
//!
//! A typed Rust client for the Rates API.

use rates_types::{CurrencyResponse, RateResponse, SyncResponse};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Rates API client.
pub struct RatesClient {
    base_url: String,
    http: Client,
}

impl RatesClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.http.get(self.url(&["health"])?).send().await?;
        Ok(resp.status().is_success())
    }

    /// Resolves today's rate for a currency abbreviation.
    pub async fn get_rate(&self, abbreviation: &str) -> Result<RateResponse, ClientError> {
        self.get(&["api", "rates", abbreviation]).await
    }

    /// Lists all currencies in the directory.
    pub async fn list_currencies(&self) -> Result<Vec<CurrencyResponse>, ClientError> {
        self.get(&["api", "currencies"]).await
    }

    /// Gets a currency by abbreviation.
    pub async fn get_currency(&self, abbreviation: &str) -> Result<CurrencyResponse, ClientError> {
        self.get(&["api", "currencies", abbreviation]).await
    }

    /// Lists stored rates of a currency, newest first.
    pub async fn list_rates(&self, abbreviation: &str) -> Result<Vec<RateResponse>, ClientError> {
        self.get(&["api", "currencies", abbreviation, "rates"])
            .await
    }

    /// Asks the server to refresh its directory from the National Bank.
    pub async fn sync_currencies(&self) -> Result<SyncResponse, ClientError> {
        let url = self.url(&["api", "currencies", "sync"])?;
        let resp = self.http.post(url).send().await?;
        self.handle_response(resp).await
    }

    /// Builds an endpoint URL; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let resp = self.http.get(self.url(segments)?).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
