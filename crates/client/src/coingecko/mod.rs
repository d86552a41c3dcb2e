//! CoinGecko market-data API client.
//!
//! Provides a client for the public CoinGecko v3 API with bounded retries,
//! request validation, and response normalization.
//!
//! ### Behavior
//!
//! - **Endpoint**: `https://api.coingecko.com/api/v3`
//! - **Retries**:
//!   - At most `max_attempts` outbound calls per fetch.
//!   - 429 backs off exponentially with jitter before the next attempt.
//!   - Other failures wait a fixed short delay; the last one is returned.
//! - **Normalization**: Converts upstream bodies into stable payload structs.

pub mod error;
pub mod request;
pub mod response;
pub mod retry;

pub use error::CoinGeckoError;
pub use request::{HistoricalRequest, PriceRequest, TopCoinsRequest};
pub use response::{CryptoPrice, GlobalStats, HistoricalData, TopCoin, TopCoins, TrendingCoin, TrendingCoins};
pub use retry::RetryPolicy;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::{ReqwestTransport, Transport};

/// Default base URL for the CoinGecko API.
const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Default per-call timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "cryptotrack/0.1";

/// CoinGecko client configuration.
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL (default: https://api.coingecko.com/api/v3).
    pub base_url: String,
    /// Per-call timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: cryptotrack/0.x).
    pub user_agent: String,
    /// Delays between attempts.
    pub retry: RetryPolicy,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl CoinGeckoConfig {
    /// Build from the application configuration.
    pub fn from_app(config: &cryptotrack_core::AppConfig) -> Self {
        Self {
            base_url: config.upstream_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy {
                rate_limit_backoff: config.rate_limit_backoff(),
                backoff_jitter: config.backoff_jitter(),
                retry_delay: config.retry_delay(),
            },
        }
    }
}

/// CoinGecko API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    transport: Arc<dyn Transport>,
    config: CoinGeckoConfig,
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient").field("config", &self.config).finish()
    }
}

impl CoinGeckoClient {
    /// Create a client backed by reqwest.
    pub fn new(config: CoinGeckoConfig) -> Result<Self, CoinGeckoError> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport.
    pub fn with_transport(config: CoinGeckoConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }

    /// GET `path` and return the parsed JSON body, using the default timeout.
    pub async fn fetch(
        &self, path: &str, query: &[(&'static str, String)], max_attempts: u32,
    ) -> Result<Value, CoinGeckoError> {
        self.fetch_with_timeout(path, query, max_attempts, self.config.timeout)
            .await
    }

    /// GET `path` with at most `max_attempts` outbound calls.
    ///
    /// A `max_attempts` of 0 still makes one call. A 429 sleeps the
    /// rate-limit backoff and retries; a 429 on the last attempt returns
    /// `RateLimited`. Any other error status or transport failure sleeps the
    /// fixed retry delay, or is returned when no attempts remain. A body that
    /// is not JSON fails immediately with `Parse`.
    pub async fn fetch_with_timeout(
        &self, path: &str, query: &[(&'static str, String)], max_attempts: u32, timeout: Duration,
    ) -> Result<Value, CoinGeckoError> {
        let attempts = max_attempts.max(1);
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut attempt = 1;

        loop {
            let failure = match self.transport.get(&url, query, timeout).await {
                Ok(response) if response.status.is_success() => {
                    return serde_json::from_slice(&response.body).map_err(|e| CoinGeckoError::Parse(e.to_string()));
                }
                Ok(response) if response.status == StatusCode::TOO_MANY_REQUESTS => {
                    if attempt >= attempts {
                        tracing::warn!(path, attempt, "rate limited on final attempt");
                        return Err(CoinGeckoError::RateLimited);
                    }
                    let delay = self.config.retry.rate_limit_delay(attempt);
                    tracing::warn!(path, attempt, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Ok(response) => CoinGeckoError::HttpError { status: response.status.as_u16() },
                Err(e) => e,
            };

            if attempt >= attempts {
                return Err(failure);
            }

            tracing::warn!(path, attempt, error = %failure, "upstream call failed, retrying");
            tokio::time::sleep(self.config.retry.retry_delay).await;
            attempt += 1;
        }
    }

    /// Fetch and deserialize into `T`.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self, path: &str, query: &[(&'static str, String)], max_attempts: u32, timeout: Duration,
    ) -> Result<T, CoinGeckoError> {
        let body = self.fetch_with_timeout(path, query, max_attempts, timeout).await?;
        serde_json::from_value(body).map_err(|e| CoinGeckoError::Parse(e.to_string()))
    }
}
