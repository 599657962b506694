//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use rates_types::{
    AppError, CurrencyDirectory, CurrencyResponse, RateCache, RateResponse, RemoteRateSource,
    ResolveError, SyncResponse,
};

use crate::RateResolver;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<D, C, S>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    pub service: RateResolver<D, C, S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        }

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Resolve today's rate for a currency.
#[tracing::instrument(skip(state))]
pub async fn resolve_rate<D, C, S>(
    State(state): State<Arc<AppState<D, C, S>>>,
    Path(abbreviation): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    let rate = state.service.resolve_rate(&abbreviation).await?;
    Ok(Json(RateResponse::from_rate(abbreviation, rate)))
}

/// List all currencies.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<D, C, S>(
    State(state): State<Arc<AppState<D, C, S>>>,
) -> Result<impl IntoResponse, ApiError>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    let currencies = state.service.list_currencies().await?;
    let body: Vec<CurrencyResponse> = currencies.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// Get a currency by abbreviation.
#[tracing::instrument(skip(state))]
pub async fn get_currency<D, C, S>(
    State(state): State<Arc<AppState<D, C, S>>>,
    Path(abbreviation): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    let currency = state.service.get_currency(&abbreviation).await?;
    Ok(Json(CurrencyResponse::from(currency)))
}

/// List stored rates of a currency.
#[tracing::instrument(skip(state))]
pub async fn list_rates<D, C, S>(
    State(state): State<Arc<AppState<D, C, S>>>,
    Path(abbreviation): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    let rates = state.service.list_rates(&abbreviation).await?;
    let body: Vec<RateResponse> = rates
        .into_iter()
        .map(|rate| RateResponse::from_rate(abbreviation.as_str(), rate))
        .collect();
    Ok(Json(body))
}

/// Refresh the currency directory from the remote source.
#[tracing::instrument(skip(state))]
pub async fn sync_currencies<D, C, S>(
    State(state): State<Arc<AppState<D, C, S>>>,
) -> Result<impl IntoResponse, ApiError>
where
    D: CurrencyDirectory,
    C: RateCache,
    S: RemoteRateSource,
{
    let synced = state.service.sync_currencies().await?;
    Ok((StatusCode::OK, Json(SyncResponse { synced })))
}
