//! CoinGecko API response types and normalization.
//!
//! Raw types mirror the upstream JSON and tolerate missing or null numbers.
//! Normalized payloads are what the HTTP layer serves and what the cache
//! stores; every payload carries `is_fallback` so consumers can tell
//! substituted data apart.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trending list length served to clients.
pub const MAX_TRENDING: usize = 7;

/// One `[timestamp_ms, value]` point of a chart series.
pub type ChartPoint = [f64; 2];

/// Entry of `/coins/markets`.
#[derive(Debug, Deserialize)]
pub struct RawMarketCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
}

/// Body of `/coins/{id}/market_chart`.
#[derive(Debug, Default, Deserialize)]
pub struct RawMarketChart {
    #[serde(default)]
    pub prices: Vec<ChartPoint>,
    #[serde(default)]
    pub market_caps: Vec<ChartPoint>,
    #[serde(default)]
    pub total_volumes: Vec<ChartPoint>,
}

/// Body of `/search/trending`.
#[derive(Debug, Deserialize)]
pub struct RawTrending {
    #[serde(default)]
    pub coins: Vec<RawTrendingEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrendingEntry {
    pub item: RawTrendingCoin,
}

#[derive(Debug, Deserialize)]
pub struct RawTrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
}

/// Body of `/global`.
#[derive(Debug, Deserialize)]
pub struct RawGlobal {
    pub data: RawGlobalData,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGlobalData {
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h_usd: Option<f64>,
    #[serde(default)]
    pub active_cryptocurrencies: Option<u64>,
    #[serde(default)]
    pub markets: Option<u64>,
}

/// Spot price snapshot for one coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPrice {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub circulating_supply: f64,
    pub last_updated: String,
    #[serde(default)]
    pub is_fallback: bool,
}

/// Chart series for one coin over `days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    pub coin_id: String,
    pub days: u32,
    pub prices: Vec<ChartPoint>,
    pub market_caps: Vec<ChartPoint>,
    pub total_volumes: Vec<ChartPoint>,
    #[serde(default)]
    pub is_fallback: bool,
}

/// Market-cap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCoins {
    pub coins: Vec<TopCoin>,
    pub last_updated: String,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: f64,
    pub total_volume: f64,
}

/// Trending search list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoins {
    pub trending_coins: Vec<TrendingCoin>,
    pub last_updated: String,
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: String,
    pub score: u32,
}

/// Whole-market aggregates in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub market_cap_change_24h: f64,
    pub active_cryptocurrencies: u64,
    pub markets: u64,
    pub btc_dominance: f64,
    pub eth_dominance: f64,
    pub last_updated: String,
    #[serde(default)]
    pub is_fallback: bool,
}

/// RFC 3339 timestamp used for `last_updated`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl CryptoPrice {
    /// Normalize a `/coins/markets` entry.
    pub fn from_market(raw: RawMarketCoin, now: DateTime<Utc>) -> Self {
        Self {
            coin_id: raw.id,
            name: raw.name,
            symbol: raw.symbol,
            current_price: raw.current_price.unwrap_or_default(),
            price_change_24h: raw.price_change_24h.unwrap_or_default(),
            price_change_percentage_24h: raw.price_change_percentage_24h.unwrap_or_default(),
            market_cap: raw.market_cap.unwrap_or_default(),
            total_volume: raw.total_volume.unwrap_or_default(),
            high_24h: raw.high_24h.unwrap_or_default(),
            low_24h: raw.low_24h.unwrap_or_default(),
            circulating_supply: raw.circulating_supply.unwrap_or_default(),
            last_updated: timestamp(now),
            is_fallback: false,
        }
    }
}

impl HistoricalData {
    pub fn from_chart(coin_id: &str, days: u32, raw: RawMarketChart) -> Self {
        Self {
            coin_id: coin_id.to_string(),
            days,
            prices: raw.prices,
            market_caps: raw.market_caps,
            total_volumes: raw.total_volumes,
            is_fallback: false,
        }
    }
}

impl From<RawMarketCoin> for TopCoin {
    fn from(raw: RawMarketCoin) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            symbol: raw.symbol,
            image: raw.image.unwrap_or_default(),
            current_price: raw.current_price.unwrap_or_default(),
            market_cap: raw.market_cap.unwrap_or_default(),
            market_cap_rank: raw.market_cap_rank.unwrap_or_default(),
            price_change_percentage_24h: raw.price_change_percentage_24h.unwrap_or_default(),
            price_change_percentage_7d: raw.price_change_percentage_7d_in_currency.unwrap_or_default(),
            total_volume: raw.total_volume.unwrap_or_default(),
        }
    }
}

impl TopCoins {
    pub fn from_markets(raw: Vec<RawMarketCoin>, now: DateTime<Utc>) -> Self {
        Self { coins: raw.into_iter().map(TopCoin::from).collect(), last_updated: timestamp(now), is_fallback: false }
    }
}

impl TrendingCoins {
    /// Keep the first entries; a missing score becomes the list position.
    pub fn from_trending(raw: RawTrending, now: DateTime<Utc>) -> Self {
        let trending_coins = raw
            .coins
            .into_iter()
            .take(MAX_TRENDING)
            .enumerate()
            .map(|(idx, entry)| TrendingCoin {
                id: entry.item.id,
                name: entry.item.name,
                symbol: entry.item.symbol,
                market_cap_rank: entry.item.market_cap_rank,
                thumb: entry.item.thumb.unwrap_or_default(),
                score: entry.item.score.unwrap_or(idx as u32),
            })
            .collect();

        Self { trending_coins, last_updated: timestamp(now), is_fallback: false }
    }
}

impl GlobalStats {
    pub fn from_global(raw: RawGlobal, now: DateTime<Utc>) -> Self {
        let data = raw.data;
        let usd = |map: &HashMap<String, f64>| map.get("usd").copied().unwrap_or_default();
        let share = |symbol: &str| data.market_cap_percentage.get(symbol).copied().unwrap_or_default();

        Self {
            total_market_cap: usd(&data.total_market_cap),
            total_volume: usd(&data.total_volume),
            market_cap_change_24h: data.market_cap_change_percentage_24h_usd.unwrap_or_default(),
            active_cryptocurrencies: data.active_cryptocurrencies.unwrap_or_default(),
            markets: data.markets.unwrap_or_default(),
            btc_dominance: share("btc"),
            eth_dominance: share("eth"),
            last_updated: timestamp(now),
            is_fallback: false,
        }
    }
}
