//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CRYPTOTRACK_*)
//! 2. TOML config file (if CRYPTOTRACK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CRYPTOTRACK_*), nested keys split on `__`
/// 2. TOML config file (if CRYPTOTRACK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    ///
    /// Set via CRYPTOTRACK_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the market-data API.
    ///
    /// Set via CRYPTOTRACK_UPSTREAM_BASE_URL environment variable.
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// User-Agent string for outbound requests.
    ///
    /// Set via CRYPTOTRACK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in milliseconds.
    ///
    /// Set via CRYPTOTRACK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Per-call timeout for historical series in milliseconds.
    ///
    /// Set via CRYPTOTRACK_HISTORICAL_TIMEOUT_MS environment variable.
    #[serde(default = "default_historical_timeout_ms")]
    pub historical_timeout_ms: u64,

    /// Outbound calls allowed per request before giving up.
    ///
    /// Set via CRYPTOTRACK_MAX_ATTEMPTS environment variable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff after a 429, doubled on every further attempt.
    ///
    /// Set via CRYPTOTRACK_RATE_LIMIT_BACKOFF_MS environment variable.
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,

    /// Upper bound of the random jitter added to rate-limit backoff.
    ///
    /// Set via CRYPTOTRACK_BACKOFF_JITTER_MS environment variable.
    #[serde(default = "default_backoff_jitter_ms")]
    pub backoff_jitter_ms: u64,

    /// Fixed delay before retrying any other failure.
    ///
    /// Set via CRYPTOTRACK_RETRY_DELAY_MS environment variable.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Allowed CORS origins; `*` allows any origin.
    ///
    /// Set via CRYPTOTRACK_CORS_ORIGINS environment variable (array syntax).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum cached keys, 0 for unbounded.
    ///
    /// Set via CRYPTOTRACK_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Seconds between cache sweeps.
    ///
    /// Set via CRYPTOTRACK_CACHE_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Entries older than this many seconds are dropped by the sweep.
    ///
    /// Set via CRYPTOTRACK_CACHE_MAX_AGE_SECS environment variable.
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,

    /// Per-category cache TTLs.
    ///
    /// Set via CRYPTOTRACK_TTL__<FIELD> environment variables.
    #[serde(default)]
    pub ttl: TtlConfig,
}

/// Cache TTLs per data category, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlConfig {
    #[serde(default = "default_price_secs")]
    pub price_secs: u64,
    #[serde(default = "default_historical_secs")]
    pub historical_secs: u64,
    #[serde(default = "default_top_coins_secs")]
    pub top_coins_secs: u64,
    #[serde(default = "default_trending_secs")]
    pub trending_secs: u64,
    #[serde(default = "default_global_secs")]
    pub global_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8001".into()
}

fn default_upstream_base_url() -> String {
    "https://api.coingecko.com/api/v3".into()
}

fn default_user_agent() -> String {
    "cryptotrack/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_historical_timeout_ms() -> u64 {
    15_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_rate_limit_backoff_ms() -> u64 {
    1_000
}

fn default_backoff_jitter_ms() -> u64 {
    500
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_cache_max_entries() -> usize {
    10_000
}

fn default_cache_sweep_interval_secs() -> u64 {
    300
}

fn default_cache_max_age_secs() -> u64 {
    600
}

fn default_price_secs() -> u64 {
    30
}

fn default_historical_secs() -> u64 {
    300
}

fn default_top_coins_secs() -> u64 {
    60
}

fn default_trending_secs() -> u64 {
    300
}

fn default_global_secs() -> u64 {
    120
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            price_secs: default_price_secs(),
            historical_secs: default_historical_secs(),
            top_coins_secs: default_top_coins_secs(),
            trending_secs: default_trending_secs(),
            global_secs: default_global_secs(),
        }
    }
}

impl TtlConfig {
    pub fn price(&self) -> Duration {
        Duration::from_secs(self.price_secs)
    }

    pub fn historical(&self) -> Duration {
        Duration::from_secs(self.historical_secs)
    }

    pub fn top_coins(&self) -> Duration {
        Duration::from_secs(self.top_coins_secs)
    }

    pub fn trending(&self) -> Duration {
        Duration::from_secs(self.trending_secs)
    }

    pub fn global(&self) -> Duration {
        Duration::from_secs(self.global_secs)
    }

    /// All TTLs by field name, for validation.
    pub(crate) fn entries(&self) -> [(&'static str, u64); 5] {
        [
            ("ttl.price_secs", self.price_secs),
            ("ttl.historical_secs", self.historical_secs),
            ("ttl.top_coins_secs", self.top_coins_secs),
            ("ttl.trending_secs", self.trending_secs),
            ("ttl.global_secs", self.global_secs),
        ]
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            upstream_base_url: default_upstream_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            historical_timeout_ms: default_historical_timeout_ms(),
            max_attempts: default_max_attempts(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            backoff_jitter_ms: default_backoff_jitter_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            cors_origins: default_cors_origins(),
            cache_max_entries: default_cache_max_entries(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            cache_max_age_secs: default_cache_max_age_secs(),
            ttl: TtlConfig::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn historical_timeout(&self) -> Duration {
        Duration::from_millis(self.historical_timeout_ms)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_millis(self.rate_limit_backoff_ms)
    }

    pub fn backoff_jitter(&self) -> Duration {
        Duration::from_millis(self.backoff_jitter_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    /// Whether any origin is allowed for CORS.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin.trim() == "*")
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CRYPTOTRACK_`
    /// 2. TOML file from `CRYPTOTRACK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CRYPTOTRACK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("CRYPTOTRACK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate configuration from a figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8001");
        assert_eq!(config.upstream_base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.user_agent, "cryptotrack/0.1");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.historical_timeout_ms, 15_000);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.ttl, TtlConfig::default());
    }

    #[test]
    fn test_default_ttls() {
        let ttl = TtlConfig::default();
        assert_eq!(ttl.price(), Duration::from_secs(30));
        assert_eq!(ttl.historical(), Duration::from_secs(300));
        assert_eq!(ttl.top_coins(), Duration::from_secs(60));
        assert_eq!(ttl.trending(), Duration::from_secs(300));
        assert_eq!(ttl.global(), Duration::from_secs(120));
    }

    #[test]
    fn test_duration_helpers() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
        assert_eq!(config.historical_timeout(), Duration::from_millis(15_000));
        assert_eq!(config.rate_limit_backoff(), Duration::from_millis(1_000));
        assert_eq!(config.backoff_jitter(), Duration::from_millis(500));
        assert_eq!(config.retry_delay(), Duration::from_millis(1_000));
        assert_eq!(config.cache_max_age(), Duration::from_secs(600));
    }

    #[test]
    fn test_cors_allows_any() {
        assert!(AppConfig::default().cors_allows_any());

        let config = AppConfig { cors_origins: vec!["https://app.example.com".into()], ..Default::default() };
        assert!(!config.cors_allows_any());
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            r#"
            max_attempts = 5
            cors_origins = ["https://app.example.com"]

            [ttl]
            price_secs = 15
            "#,
        ));

        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.cors_origins, vec!["https://app.example.com".to_string()]);
        assert_eq!(config.ttl.price_secs, 15);
        assert_eq!(config.ttl.global_secs, 120);
    }

    #[test]
    fn test_invalid_layer_fails_validation() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("max_attempts = 0"));

        let result = AppConfig::from_figment(figment);
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_attempts"));
    }
}
