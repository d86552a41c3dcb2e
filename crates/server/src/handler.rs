//! HTTP routes for the market-data API.
//!
//! Every data route returns the payload as JSON with an `x-cache` header
//! telling whether it was served from the cache, fetched, or substituted.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cryptotrack_client::{FetchOutcome, MarketService};
use cryptotrack_core::{AppConfig, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Response header carrying the cache outcome.
pub const CACHE_HEADER: &str = "x-cache";

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_LIMIT: u16 = 10;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketService>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalParams {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TopCoinsParams {
    pub limit: Option<u16>,
}

/// Build the API router with CORS and request tracing.
pub fn router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/crypto/price/:coin_id", get(price))
        .route("/api/crypto/historical/:coin_id", get(historical))
        .route("/api/crypto/top-coins", get(top_coins))
        .route("/api/crypto/trending", get(trending))
        .route("/api/crypto/global", get(global))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .expose_headers([HeaderName::from_static(CACHE_HEADER)]);

    if config.cors_allows_any() {
        tracing::info!("CORS: allowing all origins");
        return cors.allow_origin(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    tracing::info!("CORS: allowing origins {:?}", config.cors_origins);
    cors.allow_origin(origins)
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// JSON response tagged with the cache outcome.
fn respond<T: Serialize>(outcome: FetchOutcome<T>) -> Response {
    let label = outcome.label();
    ([(CACHE_HEADER, HeaderValue::from_static(label))], Json(outcome.into_inner())).into_response()
}

/// Unwrap query parameters, reporting malformed values as `INVALID_INPUT`.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError(Error::InvalidInput(rejection.body_text())))
}

async fn root() -> Json<Value> {
    Json(json!({"message": "CryptoTrack API", "status": "online"}))
}

async fn price(State(state): State<AppState>, Path(coin_id): Path<String>) -> Result<Response, ApiError> {
    Ok(respond(state.market.price(&coin_id).await?))
}

async fn historical(
    State(state): State<AppState>, Path(coin_id): Path<String>, query: Result<Query<HistoricalParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let days = query_params(query)?.days.unwrap_or(DEFAULT_DAYS);
    Ok(respond(state.market.historical(&coin_id, days).await?))
}

async fn top_coins(
    State(state): State<AppState>, query: Result<Query<TopCoinsParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let limit = query_params(query)?.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(respond(state.market.top_coins(limit).await?))
}

async fn trending(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(respond(state.market.trending().await?))
}

async fn global(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(respond(state.market.global_stats().await?))
}
