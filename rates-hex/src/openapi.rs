//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use rates_types::domain::{CurrencyId, RateId};
use rates_types::dto::{CurrencyResponse, RateResponse, SyncResponse};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Resolve today's official rate of a currency
///
/// Served from the cache when possible, then from stored rates, and
/// finally from the National Bank API (the fetched rate is stored).
#[utoipa::path(
    get,
    path = "/api/rates/{abbreviation}",
    tag = "rates",
    params(
        ("abbreviation" = String, Path, description = "Currency abbreviation, e.g. USD")
    ),
    responses(
        (status = 200, description = "Today's rate", body = RateResponse),
        (status = 404, description = "Currency not found for abbreviation"),
        (status = 502, description = "Remote rate source failed"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn resolve_rate() {}

/// List all currencies in the directory
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "currencies",
    responses(
        (status = 200, description = "List of currencies", body = Vec<CurrencyResponse>)
    )
)]
async fn list_currencies() {}

/// Get a currency by abbreviation
#[utoipa::path(
    get,
    path = "/api/currencies/{abbreviation}",
    tag = "currencies",
    params(
        ("abbreviation" = String, Path, description = "Currency abbreviation")
    ),
    responses(
        (status = 200, description = "Currency details", body = CurrencyResponse),
        (status = 404, description = "Currency not found for abbreviation")
    )
)]
async fn get_currency() {}

/// List stored rates of a currency, newest first
#[utoipa::path(
    get,
    path = "/api/currencies/{abbreviation}/rates",
    tag = "currencies",
    params(
        ("abbreviation" = String, Path, description = "Currency abbreviation")
    ),
    responses(
        (status = 200, description = "Stored rates", body = Vec<RateResponse>),
        (status = 404, description = "Currency not found for abbreviation")
    )
)]
async fn list_rates() {}

/// Refresh the currency directory from the National Bank API
#[utoipa::path(
    post,
    path = "/api/currencies/sync",
    tag = "currencies",
    responses(
        (status = 200, description = "Directory refreshed", body = SyncResponse),
        (status = 502, description = "Remote rate source failed")
    )
)]
async fn sync_currencies() {}

/// OpenAPI documentation for the Rates API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Rate Service API",
        version = "1.0.0",
        description = "Official exchange rates of the National Bank of the Republic of Belarus, cached and stored locally.",
        license(name = "MIT"),
    ),
    paths(
        health,
        resolve_rate,
        list_currencies,
        get_currency,
        list_rates,
        sync_currencies,
    ),
    components(
        schemas(
            RateResponse,
            CurrencyResponse,
            SyncResponse,
            CurrencyId,
            RateId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Rate resolution"),
        (name = "currencies", description = "Currency directory"),
    )
)]
pub struct ApiDoc;
