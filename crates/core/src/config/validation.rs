//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Longest accepted cache TTL (one day).
const MAX_TTL_SECS: u64 = 86_400;

/// Longest accepted retry delay or backoff base (one minute).
const MAX_DELAY_MS: u64 = 60_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if value > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

fn check_delay(field: &str, value: u64) -> Result<(), ConfigError> {
    if value > MAX_DELAY_MS {
        return Err(invalid(field, "must not exceed 1 minute (60000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `upstream_base_url` is not an http(s) URL
    /// - either timeout is below 100ms or above 5 minutes
    /// - a retry delay, backoff base or jitter exceeds 1 minute
    /// - `max_attempts` is outside 1..=10
    /// - `user_agent` or `cors_origins` is empty
    /// - a TTL is 0 or longer than a day
    /// - the sweep interval or max age is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid("bind_addr", "must be a socket address such as 0.0.0.0:8001"));
        }

        match url::Url::parse(&self.upstream_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("upstream_base_url", "scheme must be http or https")),
            Err(_) => return Err(invalid("upstream_base_url", "must be an absolute URL")),
        }

        check_timeout("timeout_ms", self.timeout_ms)?;
        check_timeout("historical_timeout_ms", self.historical_timeout_ms)?;
        check_delay("rate_limit_backoff_ms", self.rate_limit_backoff_ms)?;
        check_delay("backoff_jitter_ms", self.backoff_jitter_ms)?;
        check_delay("retry_delay_ms", self.retry_delay_ms)?;

        if !(1..=10).contains(&self.max_attempts) {
            return Err(invalid("max_attempts", "must be between 1 and 10"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.cors_origins.is_empty() {
            return Err(invalid("cors_origins", "must list at least one origin or \"*\""));
        }

        for (field, secs) in self.ttl.entries() {
            if secs == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
            if secs > MAX_TTL_SECS {
                return Err(invalid(field, "must not exceed one day (86400s)"));
            }
        }

        if self.cache_sweep_interval_secs == 0 {
            return Err(invalid("cache_sweep_interval_secs", "must be greater than 0"));
        }
        if self.cache_max_age_secs == 0 {
            return Err(invalid("cache_max_age_secs", "must be greater than 0"));
        }

        let longest_ttl = self.ttl.entries().iter().map(|(_, secs)| *secs).max().unwrap_or(0);
        if self.cache_max_age_secs < longest_ttl {
            tracing::warn!(
                cache_max_age_secs = self.cache_max_age_secs,
                longest_ttl,
                "cache_max_age_secs is shorter than the longest TTL; \
                 the sweep will drop entries that are still fresh"
            );
        }

        Ok(())
    }
}
