//! Remote rate source backed by the National Bank of the Republic of Belarus
//! exrates API.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use rates_types::{Currency, CurrencyId, Rate, RemoteError, RemoteRateSource};

/// HTTP client for `https://api.nbrb.by/exrates`.
pub struct NbrbClient {
    base_url: String,
    http: Client,
}

impl NbrbClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.nbrb.by/exrates";

    /// Creates a client without a request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Creates a client whose requests fail after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rates-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NbrbRate {
    #[serde(rename = "Cur_ID")]
    cur_id: i32,
    #[serde(rename = "Date")]
    date: NaiveDateTime,
    #[serde(rename = "Cur_Abbreviation")]
    abbreviation: String,
    #[serde(rename = "Cur_Scale")]
    scale: i32,
    #[serde(rename = "Cur_OfficialRate")]
    official_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct NbrbCurrency {
    #[serde(rename = "Cur_ID")]
    cur_id: i32,
    #[serde(rename = "Cur_Abbreviation")]
    abbreviation: String,
    #[serde(rename = "Cur_Name")]
    name: String,
    #[serde(rename = "Cur_Name_Eng", default)]
    name_eng: Option<String>,
    #[serde(rename = "Cur_Scale")]
    scale: i32,
    #[serde(rename = "Cur_DateEnd", default)]
    date_end: Option<NaiveDateTime>,
}

impl NbrbRate {
    fn into_domain(self) -> Result<Rate, RemoteError> {
        let official_rate = self.official_rate.ok_or_else(|| {
            RemoteError::Decode(format!("no official rate for {}", self.abbreviation))
        })?;

        Ok(
            Rate::new(CurrencyId::new(self.cur_id), self.date.date(), official_rate)
                .with_scale(self.scale),
        )
    }
}

/// Keeps one entry per abbreviation: the one valid the longest, then the
/// highest id. The API lists retired ids alongside current ones.
fn dedupe_currencies(raw: Vec<NbrbCurrency>) -> Vec<NbrbCurrency> {
    let mut latest: HashMap<String, NbrbCurrency> = HashMap::new();
    for entry in raw {
        let newer = latest.get(&entry.abbreviation).is_none_or(|current| {
            (entry.date_end, entry.cur_id) > (current.date_end, current.cur_id)
        });
        if newer {
            latest.insert(entry.abbreviation.clone(), entry);
        }
    }

    let mut currencies: Vec<NbrbCurrency> = latest.into_values().collect();
    currencies.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation));
    currencies
}

// ─────────────────────────────────────────────────────────────────────────────
// Port implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RemoteRateSource for NbrbClient {
    #[instrument(name = "NbrbRateFetch", skip(self), fields(currency_id = %currency_id))]
    async fn get_rate(&self, currency_id: CurrencyId) -> Result<Rate, RemoteError> {
        let raw: NbrbRate = self.get(&format!("/rates/{}", currency_id)).await?;
        debug!(abbreviation = %raw.abbreviation, date = %raw.date, "Received NBRB rate");
        raw.into_domain()
    }

    #[instrument(name = "NbrbCurrencyList", skip(self))]
    async fn list_currencies(&self) -> Result<Vec<Currency>, RemoteError> {
        let raw: Vec<NbrbCurrency> = self.get("/currencies").await?;
        debug!("Received {} NBRB currency entries", raw.len());

        dedupe_currencies(raw)
            .into_iter()
            .map(|c| {
                let name = c.name_eng.filter(|n| !n.trim().is_empty()).unwrap_or(c.name);
                Currency::new(CurrencyId::new(c.cur_id), c.abbreviation, name, c.scale)
                    .map_err(|e| RemoteError::Decode(e.to_string()))
            })
            .collect()
    }
}
