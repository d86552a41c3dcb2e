//! Unified error types for cryptotrack.
//!
//! Upstream failures are only surfaced through these variants when a data
//! category has no fallback payload to substitute.

/// Unified error types for the market-data layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed coin id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Upstream reported that nothing matches the request.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Upstream kept answering 429 until retries ran out.
    #[error("UPSTREAM_RATE_LIMITED: {0}")]
    UpstreamRateLimited(String),

    /// Upstream could not be reached (timeout or transport failure).
    #[error("UPSTREAM_UNAVAILABLE: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with an error status or an unreadable body.
    #[error("UPSTREAM_ERROR: {0}")]
    UpstreamError(String),

    /// Payload could not be encoded.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::UpstreamRateLimited(_) => "UPSTREAM_RATE_LIMITED",
            Error::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Error::UpstreamError(_) => "UPSTREAM_ERROR",
            Error::Internal(_) => "INTERNAL",
        }
    }

    /// Human-readable detail without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidInput(msg)
            | Error::NotFound(msg)
            | Error::UpstreamRateLimited(msg)
            | Error::UpstreamUnavailable(msg)
            | Error::UpstreamError(msg)
            | Error::Internal(msg) => msg,
        }
    }

    /// Whether the failure originated upstream rather than in the request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::UpstreamRateLimited(_) | Error::UpstreamUnavailable(_) | Error::UpstreamError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("cryptocurrency dogecoinz not found".to_string());
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("dogecoinz"));
    }

    #[test]
    fn test_code_and_message() {
        let err = Error::UpstreamError("HTTP 502".to_string());
        assert_eq!(err.code(), "UPSTREAM_ERROR");
        assert_eq!(err.message(), "HTTP 502");
    }

    #[test]
    fn test_is_upstream() {
        assert!(Error::UpstreamRateLimited("429".into()).is_upstream());
        assert!(Error::UpstreamUnavailable("timeout".into()).is_upstream());
        assert!(!Error::InvalidInput("days".into()).is_upstream());
        assert!(!Error::NotFound("x".into()).is_upstream());
    }
}
