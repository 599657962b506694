//! # Rates Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the currency directory, rate cache and NBRB client
//! - Create the rate resolver
//! - Start the HTTP server

mod config;

use std::time::Duration;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rates_hex::{
    RateResolver,
    inbound::{HttpServer, RateLimiterState},
};
use rates_repo::{InMemoryRateCache, NbrbClient, build_repo};

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("rates-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::from_env()?;

    // OTLP export only when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rates_app=debug,rates_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting rates server on port {}", config.port);
    tracing::info!("Using database: {}", config.database_url);
    tracing::info!("Using NBRB API: {}", config.nbrb_api_url);

    let repo = build_repo(&config.database_url).await?;

    let cache = InMemoryRateCache::new(config.cache_max_entries, config.cache_ttl);

    let remote = NbrbClient::with_timeout(&config.nbrb_api_url, config.nbrb_timeout)?;

    let service = RateResolver::new(repo, cache, remote);

    if config.sync_on_start {
        match service.sync_currencies().await {
            Ok(synced) => tracing::info!("Synced {} currencies from NBRB", synced),
            Err(e) => tracing::warn!("Currency sync on start failed: {}", e),
        }
    }

    let rate_limiter = RateLimiterState::new(config.rate_limit_per_minute, Duration::from_secs(60))
        .with_trusted_proxies(config.trusted_proxies);
    let server = HttpServer::new(service, rate_limiter);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    if let Some((_, provider)) = otel {
        if let Err(e) = provider.shutdown() {
            tracing::warn!("Failed to flush traces: {}", e);
        }
    }
    Ok(())
}
