//! HTTP Server configuration and startup.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use rates_types::{CurrencyDirectory, RateCache, RemoteRateSource};

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::RateResolver;

/// HTTP Server for the Rates API.
pub struct HttpServer<D, C, S>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    state: Arc<AppState<D, C, S>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<D, C, S> HttpServer<D, C, S>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    /// Creates a new HTTP server with the given resolver and rate limiter.
    pub fn new(service: RateResolver<D, C, S>, rate_limiter: RateLimiterState) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route(
                "/api/rates/{abbreviation}",
                get(handlers::resolve_rate::<D, C, S>),
            )
            .route("/api/currencies", get(handlers::list_currencies::<D, C, S>))
            .route(
                "/api/currencies/sync",
                post(handlers::sync_currencies::<D, C, S>),
            )
            .route(
                "/api/currencies/{abbreviation}",
                get(handlers::get_currency::<D, C, S>),
            )
            .route(
                "/api/currencies/{abbreviation}/rates",
                get(handlers::list_rates::<D, C, S>),
            )
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let limiter = self.rate_limiter.clone();
        let pruner = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(60));
            loop {
                tick.tick().await;
                limiter.prune();
            }
        });

        let served = axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        pruner.abort();
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
