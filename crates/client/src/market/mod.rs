//! Market data service.
//!
//! Every operation follows the same path: validate the input, consult the
//! cache under the category's TTL, fetch from CoinGecko on a miss, and fall
//! back to a static or synthetic payload when the upstream cannot be
//! reached. Fallback payloads are never written to the cache, so the next
//! request retries the upstream.

mod outcome;

pub use outcome::FetchOutcome;

use chrono::Utc;
use cryptotrack_core::cache::keys;
use cryptotrack_core::{AppConfig, Error, TtlCache, TtlConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::coingecko::request::{GLOBAL_PATH, TRENDING_PATH};
use crate::coingecko::response::{RawGlobal, RawMarketChart, RawMarketCoin, RawTrending};
use crate::coingecko::{
    CoinGeckoClient, CoinGeckoConfig, CoinGeckoError, CryptoPrice, GlobalStats, HistoricalData, HistoricalRequest,
    PriceRequest, TopCoins, TopCoinsRequest, TrendingCoins,
};
use crate::fallback;

/// Per-category freshness and upstream call budget.
#[derive(Debug, Clone)]
pub struct MarketSettings {
    pub ttl: TtlConfig,
    /// Outbound calls allowed per fetch.
    pub max_attempts: u32,
    /// Per-call timeout for historical series.
    pub historical_timeout: Duration,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self { ttl: TtlConfig::default(), max_attempts: 3, historical_timeout: Duration::from_secs(15) }
    }
}

impl MarketSettings {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            ttl: config.ttl.clone(),
            max_attempts: config.max_attempts,
            historical_timeout: config.historical_timeout(),
        }
    }
}

/// Cached, fallback-aware access to market data.
#[derive(Debug, Clone)]
pub struct MarketService {
    client: CoinGeckoClient,
    cache: Arc<TtlCache>,
    settings: MarketSettings,
}

impl MarketService {
    pub fn new(client: CoinGeckoClient, cache: Arc<TtlCache>, settings: MarketSettings) -> Self {
        Self { client, cache, settings }
    }

    /// Build the production service from application config.
    pub fn from_config(config: &AppConfig, cache: Arc<TtlCache>) -> Result<Self, Error> {
        let client = CoinGeckoClient::new(CoinGeckoConfig::from_app(config))
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, cache, MarketSettings::from_app(config)))
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    pub fn settings(&self) -> &MarketSettings {
        &self.settings
    }

    /// Spot price for one coin.
    ///
    /// Falls back to the reference snapshot for well-known coins only.
    pub async fn price(&self, coin_id: &str) -> Result<FetchOutcome<CryptoPrice>, Error> {
        let request = PriceRequest::new(coin_id)?;

        let fetch = async {
            let mut coins: Vec<RawMarketCoin> = self
                .client
                .fetch_as(request.path(), &request.query(), self.settings.max_attempts, self.client.config().timeout)
                .await?;
            if coins.is_empty() {
                return Err(CoinGeckoError::NotFound(format!("coin not found: {}", request.coin_id)));
            }
            Ok(CryptoPrice::from_market(coins.swap_remove(0), Utc::now()))
        };

        self.resolve(&request.cache_key(), self.settings.ttl.price(), fetch, || fallback::price(&request.coin_id))
            .await
    }

    /// Price, market-cap and volume series over the last `days`.
    pub async fn historical(&self, coin_id: &str, days: u32) -> Result<FetchOutcome<HistoricalData>, Error> {
        let request = HistoricalRequest::new(coin_id, days)?;

        let fetch = async {
            let chart: RawMarketChart = self
                .client
                .fetch_as(
                    &request.path(),
                    &request.query(),
                    self.settings.max_attempts,
                    self.settings.historical_timeout,
                )
                .await?;
            Ok::<_, CoinGeckoError>(HistoricalData::from_chart(&request.coin_id, request.days, chart))
        };

        self.resolve(&request.cache_key(), self.settings.ttl.historical(), fetch, || {
            Some(fallback::historical(&request.coin_id, request.days))
        })
        .await
    }

    /// Top coins by market cap.
    pub async fn top_coins(&self, limit: u16) -> Result<FetchOutcome<TopCoins>, Error> {
        let request = TopCoinsRequest::new(limit)?;

        let fetch = async {
            let coins: Vec<RawMarketCoin> = self
                .client
                .fetch_as(request.path(), &request.query(), self.settings.max_attempts, self.client.config().timeout)
                .await?;
            Ok::<_, CoinGeckoError>(TopCoins::from_markets(coins, Utc::now()))
        };

        self.resolve(&request.cache_key(), self.settings.ttl.top_coins(), fetch, || {
            Some(fallback::top_coins(request.limit))
        })
        .await
    }

    pub async fn trending(&self) -> Result<FetchOutcome<TrendingCoins>, Error> {
        let fetch = async {
            let raw: RawTrending = self
                .client
                .fetch_as(TRENDING_PATH, &[], self.settings.max_attempts, self.client.config().timeout)
                .await?;
            Ok::<_, CoinGeckoError>(TrendingCoins::from_trending(raw, Utc::now()))
        };

        self.resolve(keys::TRENDING_KEY, self.settings.ttl.trending(), fetch, || Some(fallback::trending()))
            .await
    }

    /// Global market aggregates.
    pub async fn global_stats(&self) -> Result<FetchOutcome<GlobalStats>, Error> {
        let fetch = async {
            let raw: RawGlobal = self
                .client
                .fetch_as(GLOBAL_PATH, &[], self.settings.max_attempts, self.client.config().timeout)
                .await?;
            Ok::<_, CoinGeckoError>(GlobalStats::from_global(raw, Utc::now()))
        };

        self.resolve(keys::GLOBAL_KEY, self.settings.ttl.global(), fetch, || Some(fallback::global_stats()))
            .await
    }

    /// Cache lookup, upstream fetch, then fallback.
    ///
    /// `fetch` is only polled on a miss. A not-found answer is returned as
    /// `Error::NotFound` and never replaced by a fallback.
    async fn resolve<T, Fut, F>(
        &self, key: &str, ttl: Duration, fetch: Fut, substitute: F,
    ) -> Result<FetchOutcome<T>, Error>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, CoinGeckoError>>,
        F: FnOnce() -> Option<T>,
    {
        if let Some(cached) = self.cache.get(key, ttl).await {
            match serde_json::from_value(cached) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(FetchOutcome::Hit(value));
                }
                Err(e) => tracing::warn!(key, error = %e, "discarding unreadable cache entry"),
            }
        }

        match fetch.await {
            Ok(value) => {
                let encoded = serde_json::to_value(&value).map_err(|e| Error::Internal(e.to_string()))?;
                self.cache.set(key, encoded).await;
                tracing::debug!(key, "cache refreshed from upstream");
                Ok(FetchOutcome::Fresh(value))
            }
            Err(e) if e.is_not_found() => Err(e.into()),
            Err(e) => match substitute() {
                Some(value) => {
                    tracing::error!(key, error = %e, "upstream failed, serving fallback");
                    Ok(FetchOutcome::Fallback(value))
                }
                None => {
                    tracing::error!(key, error = %e, "upstream failed, no fallback available");
                    Err(e.into())
                }
            },
        }
    }
}
