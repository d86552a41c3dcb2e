//! Client code for cryptotrack.
//!
//! This crate provides the CoinGecko client with bounded retries, fallback
//! payloads, and the cached market service used by the HTTP server.

pub mod coingecko;
pub mod fallback;
pub mod market;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use coingecko::{
    CoinGeckoClient, CoinGeckoConfig, CoinGeckoError, CryptoPrice, GlobalStats, HistoricalData, RetryPolicy, TopCoin,
    TopCoins, TrendingCoin, TrendingCoins,
};
pub use market::{FetchOutcome, MarketService, MarketSettings};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
