//! Outbound HTTP transport.
//!
//! The `Transport` trait performs exactly one GET and reports the raw status
//! and body; retry and status interpretation live in the CoinGecko client.
//! `ReqwestTransport` is the production implementation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use crate::coingecko::CoinGeckoError;

/// Status and body of a single outbound call.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self { status, body: body.into() }
    }
}

/// One outbound GET with a per-call timeout.
///
/// Transport failures map to `CoinGeckoError::Timeout` or `Network`; any
/// received status, including errors, is returned as a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self, url: &str, query: &[(&'static str, String)], timeout: Duration,
    ) -> Result<TransportResponse, CoinGeckoError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport sending `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self, CoinGeckoError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self, url: &str, query: &[(&'static str, String)], timeout: Duration,
    ) -> Result<TransportResponse, CoinGeckoError> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .query(query)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(TransportResponse { status, body })
    }
}
