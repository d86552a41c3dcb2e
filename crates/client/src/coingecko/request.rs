//! CoinGecko API request types and validation.
//!
//! Each request knows its upstream path, query parameters, and cache key.
//! Construction validates the inbound parameters so malformed input never
//! reaches the cache or the network.

use std::sync::LazyLock;

use cryptotrack_core::cache::keys;
use regex::Regex;

use super::CoinGeckoError;

/// Quote currency for every request.
pub const VS_CURRENCY: &str = "usd";

/// Longest history accepted, in days.
pub const MAX_DAYS: u32 = 3650;

/// Largest page CoinGecko serves for `/coins/markets`.
pub const MAX_LIMIT: u16 = 250;

static COIN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,99}$").expect("coin id pattern is valid"));

/// Query parameters as sent on the wire.
pub type Query = Vec<(&'static str, String)>;

/// Normalize and validate a coin identifier.
pub fn normalize_coin_id(raw: &str) -> Result<String, CoinGeckoError> {
    let coin_id = raw.trim().to_lowercase();
    if coin_id.is_empty() {
        return Err(CoinGeckoError::InvalidRequest("coin id cannot be empty".to_string()));
    }
    if !COIN_ID.is_match(&coin_id) {
        return Err(CoinGeckoError::InvalidRequest(format!("invalid coin id: {raw}")));
    }
    Ok(coin_id)
}

/// Spot price for one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub coin_id: String,
}

impl PriceRequest {
    pub fn new(coin_id: &str) -> Result<Self, CoinGeckoError> {
        Ok(Self { coin_id: normalize_coin_id(coin_id)? })
    }

    pub fn path(&self) -> &'static str {
        "/coins/markets"
    }

    pub fn query(&self) -> Query {
        vec![
            ("vs_currency", VS_CURRENCY.to_string()),
            ("ids", self.coin_id.clone()),
            ("order", "market_cap_desc".to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ]
    }

    pub fn cache_key(&self) -> String {
        keys::price_key(&self.coin_id)
    }
}

/// Price, market-cap and volume history for one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRequest {
    pub coin_id: String,
    pub days: u32,
}

impl HistoricalRequest {
    pub fn new(coin_id: &str, days: u32) -> Result<Self, CoinGeckoError> {
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(CoinGeckoError::InvalidRequest(format!("days must be between 1 and {MAX_DAYS}")));
        }
        Ok(Self { coin_id: normalize_coin_id(coin_id)?, days })
    }

    pub fn path(&self) -> String {
        format!("/coins/{}/market_chart", self.coin_id)
    }

    /// Daily points for multi-day windows, hourly for a single day.
    pub fn interval(&self) -> &'static str {
        if self.days > 1 { "daily" } else { "hourly" }
    }

    pub fn query(&self) -> Query {
        vec![
            ("vs_currency", VS_CURRENCY.to_string()),
            ("days", self.days.to_string()),
            ("interval", self.interval().to_string()),
        ]
    }

    pub fn cache_key(&self) -> String {
        keys::historical_key(&self.coin_id, self.days)
    }
}

/// Top coins ranked by market cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopCoinsRequest {
    pub limit: u16,
}

impl TopCoinsRequest {
    pub fn new(limit: u16) -> Result<Self, CoinGeckoError> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CoinGeckoError::InvalidRequest(format!("limit must be between 1 and {MAX_LIMIT}")));
        }
        Ok(Self { limit })
    }

    pub fn path(&self) -> &'static str {
        "/coins/markets"
    }

    pub fn query(&self) -> Query {
        vec![
            ("vs_currency", VS_CURRENCY.to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", self.limit.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h,7d".to_string()),
        ]
    }

    pub fn cache_key(&self) -> String {
        keys::top_coins_key(self.limit)
    }
}

pub const TRENDING_PATH: &str = "/search/trending";
pub const GLOBAL_PATH: &str = "/global";

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(query: &'a Query, name: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_normalize_coin_id() {
        assert_eq!(normalize_coin_id(" Bitcoin ").unwrap(), "bitcoin");
        assert_eq!(normalize_coin_id("usd-coin").unwrap(), "usd-coin");
        assert_eq!(normalize_coin_id("0x").unwrap(), "0x");
    }

    #[test]
    fn test_invalid_coin_ids() {
        let too_long = "a".repeat(101);
        for raw in ["", "   ", "bad$id", "-leading", "a/b", "white space", too_long.as_str()] {
            assert!(
                matches!(normalize_coin_id(raw), Err(CoinGeckoError::InvalidRequest(_))),
                "coin id {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_price_request() {
        let req = PriceRequest::new("Ethereum").unwrap();
        let query = req.query();
        assert_eq!(req.path(), "/coins/markets");
        assert_eq!(param(&query, "ids"), Some("ethereum"));
        assert_eq!(param(&query, "vs_currency"), Some("usd"));
        assert_eq!(param(&query, "price_change_percentage"), Some("24h"));
        assert_eq!(req.cache_key(), "price:ethereum");
    }

    #[test]
    fn test_historical_interval() {
        let daily = HistoricalRequest::new("bitcoin", 7).unwrap();
        assert_eq!(daily.interval(), "daily");
        assert_eq!(daily.path(), "/coins/bitcoin/market_chart");
        assert_eq!(param(&daily.query(), "days"), Some("7"));

        let hourly = HistoricalRequest::new("bitcoin", 1).unwrap();
        assert_eq!(hourly.interval(), "hourly");
        assert_eq!(hourly.cache_key(), "historical:bitcoin:1");
    }

    #[test]
    fn test_historical_days_range() {
        assert!(HistoricalRequest::new("bitcoin", 0).is_err());
        assert!(HistoricalRequest::new("bitcoin", MAX_DAYS + 1).is_err());
        assert!(HistoricalRequest::new("bitcoin", MAX_DAYS).is_ok());
    }

    #[test]
    fn test_top_coins_request() {
        let req = TopCoinsRequest::new(25).unwrap();
        let query = req.query();
        assert_eq!(param(&query, "per_page"), Some("25"));
        assert_eq!(param(&query, "page"), Some("1"));
        assert_eq!(param(&query, "price_change_percentage"), Some("24h,7d"));
        assert_eq!(req.cache_key(), "top_coins:25");
    }

    #[test]
    fn test_top_coins_limit_range() {
        assert!(matches!(TopCoinsRequest::new(0), Err(CoinGeckoError::InvalidRequest(_))));
        assert!(matches!(TopCoinsRequest::new(251), Err(CoinGeckoError::InvalidRequest(_))));
        assert!(TopCoinsRequest::new(250).is_ok());
    }
}
