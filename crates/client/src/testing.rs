//! Scripted transport for tests.
//!
//! Responses are replayed in push order. Once the script runs out every call
//! answers HTTP 500, which keeps "upstream is down" tests short.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::coingecko::CoinGeckoError;
use crate::transport::{Transport, TransportResponse};

/// A request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub timeout: Duration,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, CoinGeckoError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_body(&self, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.push(Ok(TransportResponse::new(status, body.into())));
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.push_body(200, body.to_string());
    }

    pub fn push_status(&self, status: u16) {
        self.push_body(status, "{}");
    }

    pub fn push_error(&self, error: CoinGeckoError) {
        self.push(Err(error));
    }

    fn push(&self, entry: Result<TransportResponse, CoinGeckoError>) {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(entry);
    }

    /// Number of outbound calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self, url: &str, query: &[(&'static str, String)], timeout: Duration,
    ) -> Result<TransportResponse, CoinGeckoError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest { url: url.to_string(), query: query.to_vec(), timeout });

        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "script exhausted")))
    }
}
