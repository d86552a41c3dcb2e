//! CoinGecko client error types.

use cryptotrack_core::Error;
use std::sync::Arc;

/// Errors from the CoinGecko API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoinGeckoError {
    /// Request parameters failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream returned no match for the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by CoinGecko on every attempt.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl CoinGeckoError {
    /// Whether upstream explicitly reported that nothing matches.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoinGeckoError::NotFound(_) | CoinGeckoError::HttpError { status: 404 })
    }
}

impl From<reqwest::Error> for CoinGeckoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { CoinGeckoError::Timeout } else { CoinGeckoError::Network(Arc::new(err)) }
    }
}

impl From<CoinGeckoError> for Error {
    fn from(err: CoinGeckoError) -> Self {
        match err {
            CoinGeckoError::InvalidRequest(msg) => Error::InvalidInput(msg),
            CoinGeckoError::NotFound(msg) => Error::NotFound(msg),
            CoinGeckoError::HttpError { status: 404 } => Error::NotFound("upstream returned HTTP 404".into()),
            CoinGeckoError::RateLimited => Error::UpstreamRateLimited(err.to_string()),
            CoinGeckoError::Timeout | CoinGeckoError::Network(_) => Error::UpstreamUnavailable(err.to_string()),
            CoinGeckoError::HttpError { .. } | CoinGeckoError::Parse(_) => Error::UpstreamError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoinGeckoError::RateLimited;
        assert!(err.to_string().contains("rate limited"));

        let err = CoinGeckoError::InvalidRequest("days".to_string());
        assert!(err.to_string().contains("invalid request"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(CoinGeckoError::NotFound("x".into()).is_not_found());
        assert!(CoinGeckoError::HttpError { status: 404 }.is_not_found());
        assert!(!CoinGeckoError::HttpError { status: 500 }.is_not_found());
        assert!(!CoinGeckoError::Timeout.is_not_found());
    }

    #[test]
    fn test_into_core_error() {
        assert!(matches!(Error::from(CoinGeckoError::RateLimited), Error::UpstreamRateLimited(_)));
        assert!(matches!(Error::from(CoinGeckoError::Timeout), Error::UpstreamUnavailable(_)));
        assert!(matches!(Error::from(CoinGeckoError::HttpError { status: 503 }), Error::UpstreamError(_)));
        assert!(matches!(Error::from(CoinGeckoError::HttpError { status: 404 }), Error::NotFound(_)));
        assert!(matches!(Error::from(CoinGeckoError::Parse("eof".into())), Error::UpstreamError(_)));
        assert!(matches!(Error::from(CoinGeckoError::InvalidRequest("bad".into())), Error::InvalidInput(_)));
    }
}
