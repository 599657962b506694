//! Configuration loading from environment.

use std::env;
use std::net::IpAddr;
use std::time::Duration;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub nbrb_api_url: String,
    pub nbrb_timeout: Duration,
    /// `None` keeps cached rates until restart
    pub cache_ttl: Option<Duration>,
    pub cache_max_entries: u64,
    pub rate_limit_per_minute: u32,
    /// Reverse proxies whose `X-Forwarded-For` is believed
    pub trusted_proxies: Vec<IpAddr>,
    pub sync_on_start: bool,
    /// OTLP export is enabled only when this is set
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT").unwrap_or_else(|| "3000".to_string()).parse()?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let nbrb_api_url = var("NBRB_API_URL")
            .unwrap_or_else(|| rates_repo::NbrbClient::DEFAULT_BASE_URL.to_string());

        let nbrb_timeout = Duration::from_secs(
            var("NBRB_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse()?,
        );

        let cache_ttl = match var("RATE_CACHE_TTL_SECS") {
            Some(secs) => match secs.parse::<u64>()? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        let cache_max_entries = match var("RATE_CACHE_MAX_ENTRIES") {
            Some(n) => n.parse()?,
            None => rates_repo::InMemoryRateCache::DEFAULT_MAX_ENTRIES,
        };

        let rate_limit_per_minute = var("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()?;

        let trusted_proxies = var("TRUSTED_PROXIES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| anyhow::anyhow!("Invalid proxy address in TRUSTED_PROXIES: {}", s))
            })
            .collect::<anyhow::Result<Vec<IpAddr>>>()?;

        let sync_on_start = match var("SYNC_ON_START") {
            Some(flag) => parse_flag(&flag)?,
            None => true,
        };

        let otlp_endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            port,
            database_url,
            nbrb_api_url,
            nbrb_timeout,
            cache_ttl,
            cache_max_entries,
            rate_limit_per_minute,
            trusted_proxies,
            sync_on_start,
            otlp_endpoint,
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Invalid boolean value: {}", other),
    }
}
