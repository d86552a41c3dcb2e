//! Static and synthetic payloads served when the upstream is unreachable.
//!
//! Every payload built here has `is_fallback = true`. Figures are a fixed
//! reference snapshot, not live data.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::coingecko::response::{ChartPoint, MAX_TRENDING, timestamp};
use crate::coingecko::{CryptoPrice, GlobalStats, HistoricalData, TopCoin, TopCoins, TrendingCoin, TrendingCoins};

/// One day in milliseconds.
pub const DAY_MS: i64 = 86_400_000;

/// Relative bound of the noise applied to synthetic prices.
pub const PRICE_NOISE: f64 = 0.05;

/// Base price for coins missing from the reference table.
const UNKNOWN_BASE_PRICE: f64 = 1.0;

/// Supply used to derive market caps for unknown coins.
const UNKNOWN_SUPPLY: f64 = 1_000_000.0;

/// Share of market cap reported as daily volume in synthetic series.
const VOLUME_RATIO: f64 = 0.05;

/// Reference snapshot of a well-known coin.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCoin {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub image: &'static str,
    pub price: f64,
    pub change_24h_pct: f64,
    pub change_7d_pct: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub circulating_supply: f64,
    pub rank: u32,
}

/// Top ten by market cap, ordered by rank.
pub const REFERENCE_COINS: &[ReferenceCoin] = &[
    ReferenceCoin {
        id: "bitcoin",
        name: "Bitcoin",
        symbol: "btc",
        image: "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
        price: 97_000.0,
        change_24h_pct: 1.2,
        change_7d_pct: 3.4,
        market_cap: 1_920_000_000_000.0,
        total_volume: 35_000_000_000.0,
        circulating_supply: 19_800_000.0,
        rank: 1,
    },
    ReferenceCoin {
        id: "ethereum",
        name: "Ethereum",
        symbol: "eth",
        image: "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
        price: 3_400.0,
        change_24h_pct: 0.8,
        change_7d_pct: 2.1,
        market_cap: 410_000_000_000.0,
        total_volume: 18_000_000_000.0,
        circulating_supply: 120_500_000.0,
        rank: 2,
    },
    ReferenceCoin {
        id: "tether",
        name: "Tether",
        symbol: "usdt",
        image: "https://assets.coingecko.com/coins/images/325/large/Tether.png",
        price: 1.0,
        change_24h_pct: 0.01,
        change_7d_pct: 0.02,
        market_cap: 140_000_000_000.0,
        total_volume: 60_000_000_000.0,
        circulating_supply: 140_000_000_000.0,
        rank: 3,
    },
    ReferenceCoin {
        id: "binancecoin",
        name: "BNB",
        symbol: "bnb",
        image: "https://assets.coingecko.com/coins/images/825/large/bnb-icon2_2x.png",
        price: 650.0,
        change_24h_pct: 0.5,
        change_7d_pct: 1.6,
        market_cap: 94_000_000_000.0,
        total_volume: 1_800_000_000.0,
        circulating_supply: 144_000_000.0,
        rank: 4,
    },
    ReferenceCoin {
        id: "solana",
        name: "Solana",
        symbol: "sol",
        image: "https://assets.coingecko.com/coins/images/4128/large/solana.png",
        price: 190.0,
        change_24h_pct: 2.3,
        change_7d_pct: 5.2,
        market_cap: 90_000_000_000.0,
        total_volume: 4_000_000_000.0,
        circulating_supply: 475_000_000.0,
        rank: 5,
    },
    ReferenceCoin {
        id: "ripple",
        name: "XRP",
        symbol: "xrp",
        image: "https://assets.coingecko.com/coins/images/44/large/xrp-symbol-white-128.png",
        price: 2.3,
        change_24h_pct: -0.4,
        change_7d_pct: 1.1,
        market_cap: 132_000_000_000.0,
        total_volume: 5_500_000_000.0,
        circulating_supply: 57_500_000_000.0,
        rank: 6,
    },
    ReferenceCoin {
        id: "usd-coin",
        name: "USDC",
        symbol: "usdc",
        image: "https://assets.coingecko.com/coins/images/6319/large/usdc.png",
        price: 1.0,
        change_24h_pct: 0.0,
        change_7d_pct: 0.01,
        market_cap: 45_000_000_000.0,
        total_volume: 7_000_000_000.0,
        circulating_supply: 45_000_000_000.0,
        rank: 7,
    },
    ReferenceCoin {
        id: "cardano",
        name: "Cardano",
        symbol: "ada",
        image: "https://assets.coingecko.com/coins/images/975/large/cardano.png",
        price: 0.95,
        change_24h_pct: -1.1,
        change_7d_pct: -2.4,
        market_cap: 33_500_000_000.0,
        total_volume: 900_000_000.0,
        circulating_supply: 35_200_000_000.0,
        rank: 8,
    },
    ReferenceCoin {
        id: "dogecoin",
        name: "Dogecoin",
        symbol: "doge",
        image: "https://assets.coingecko.com/coins/images/5/large/dogecoin.png",
        price: 0.32,
        change_24h_pct: 1.9,
        change_7d_pct: 4.0,
        market_cap: 47_000_000_000.0,
        total_volume: 2_600_000_000.0,
        circulating_supply: 147_000_000_000.0,
        rank: 9,
    },
    ReferenceCoin {
        id: "tron",
        name: "TRON",
        symbol: "trx",
        image: "https://assets.coingecko.com/coins/images/1094/large/tron-logo.png",
        price: 0.25,
        change_24h_pct: 0.3,
        change_7d_pct: 0.9,
        market_cap: 21_500_000_000.0,
        total_volume: 600_000_000.0,
        circulating_supply: 86_000_000_000.0,
        rank: 10,
    },
];

/// (id, name, symbol, market_cap_rank)
const REFERENCE_TRENDING: [(&str, &str, &str, Option<u32>); MAX_TRENDING] = [
    ("bitcoin", "Bitcoin", "btc", Some(1)),
    ("solana", "Solana", "sol", Some(5)),
    ("ethereum", "Ethereum", "eth", Some(2)),
    ("dogecoin", "Dogecoin", "doge", Some(9)),
    ("ripple", "XRP", "xrp", Some(6)),
    ("cardano", "Cardano", "ada", Some(8)),
    ("pepe", "Pepe", "pepe", None),
];

/// Look up a coin in the reference table.
pub fn reference_coin(coin_id: &str) -> Option<&'static ReferenceCoin> {
    REFERENCE_COINS.iter().find(|coin| coin.id == coin_id)
}

/// Reference price snapshot, if the coin is in the table.
pub fn price(coin_id: &str) -> Option<CryptoPrice> {
    let coin = reference_coin(coin_id)?;
    let change = coin.price * coin.change_24h_pct / 100.0;

    Some(CryptoPrice {
        coin_id: coin.id.to_string(),
        name: coin.name.to_string(),
        symbol: coin.symbol.to_string(),
        current_price: coin.price,
        price_change_24h: change,
        price_change_percentage_24h: coin.change_24h_pct,
        market_cap: coin.market_cap,
        total_volume: coin.total_volume,
        high_24h: coin.price.max(coin.price - change),
        low_24h: coin.price.min(coin.price - change),
        circulating_supply: coin.circulating_supply,
        last_updated: timestamp(Utc::now()),
        is_fallback: true,
    })
}

/// Synthetic daily series ending now.
pub fn historical(coin_id: &str, days: u32) -> HistoricalData {
    historical_at(coin_id, days, Utc::now(), &mut rand::rng())
}

/// Synthetic daily series of `days + 1` points ending at `now`.
///
/// Points are exactly one day apart. Each price is the coin's reference
/// price scaled by a uniform factor in `1 ± PRICE_NOISE`.
pub fn historical_at<R: Rng + ?Sized>(coin_id: &str, days: u32, now: DateTime<Utc>, rng: &mut R) -> HistoricalData {
    let (base_price, supply) = reference_coin(coin_id)
        .map(|coin| (coin.price, coin.circulating_supply))
        .unwrap_or((UNKNOWN_BASE_PRICE, UNKNOWN_SUPPLY));
    let end_ms = now.timestamp_millis();

    let mut prices: Vec<ChartPoint> = Vec::with_capacity(days as usize + 1);
    let mut market_caps: Vec<ChartPoint> = Vec::with_capacity(days as usize + 1);
    let mut total_volumes: Vec<ChartPoint> = Vec::with_capacity(days as usize + 1);

    for offset in (0..=i64::from(days)).rev() {
        let ts = (end_ms - offset * DAY_MS) as f64;
        let price = base_price * (1.0 + rng.random_range(-PRICE_NOISE..=PRICE_NOISE));
        let market_cap = price * supply;

        prices.push([ts, price]);
        market_caps.push([ts, market_cap]);
        total_volumes.push([ts, market_cap * VOLUME_RATIO]);
    }

    HistoricalData { coin_id: coin_id.to_string(), days, prices, market_caps, total_volumes, is_fallback: true }
}

/// Reference ranking truncated to `limit`.
pub fn top_coins(limit: u16) -> TopCoins {
    let coins = REFERENCE_COINS
        .iter()
        .take(limit as usize)
        .map(|coin| TopCoin {
            id: coin.id.to_string(),
            name: coin.name.to_string(),
            symbol: coin.symbol.to_string(),
            image: coin.image.to_string(),
            current_price: coin.price,
            market_cap: coin.market_cap,
            market_cap_rank: coin.rank,
            price_change_percentage_24h: coin.change_24h_pct,
            price_change_percentage_7d: coin.change_7d_pct,
            total_volume: coin.total_volume,
        })
        .collect();

    TopCoins { coins, last_updated: timestamp(Utc::now()), is_fallback: true }
}

pub fn trending() -> TrendingCoins {
    let trending_coins = REFERENCE_TRENDING
        .iter()
        .enumerate()
        .map(|(idx, (id, name, symbol, rank))| TrendingCoin {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            market_cap_rank: *rank,
            thumb: reference_coin(id).map(|coin| coin.image.to_string()).unwrap_or_default(),
            score: idx as u32,
        })
        .collect();

    TrendingCoins { trending_coins, last_updated: timestamp(Utc::now()), is_fallback: true }
}

pub fn global_stats() -> GlobalStats {
    GlobalStats {
        total_market_cap: 3_400_000_000_000.0,
        total_volume: 120_000_000_000.0,
        market_cap_change_24h: -0.5,
        active_cryptocurrencies: 17_000,
        markets: 1_200,
        btc_dominance: 56.0,
        eth_dominance: 12.0,
        last_updated: timestamp(Utc::now()),
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-19T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_reference_table_is_ranked() {
        for (idx, coin) in REFERENCE_COINS.iter().enumerate() {
            assert_eq!(coin.rank as usize, idx + 1, "{} out of order", coin.id);
        }
    }

    #[test]
    fn test_price_known_and_unknown() {
        let btc = price("bitcoin").unwrap();
        assert!(btc.is_fallback);
        assert_eq!(btc.current_price, 97_000.0);
        assert!(btc.low_24h <= btc.current_price && btc.current_price <= btc.high_24h);

        assert!(price("not-a-real-coin").is_none());
    }

    #[test]
    fn test_seven_day_series_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = historical_at("bitcoin", 7, now(), &mut rng);

        assert!(data.is_fallback);
        assert_eq!(data.prices.len(), 8);
        assert_eq!(data.market_caps.len(), 8);
        assert_eq!(data.total_volumes.len(), 8);

        for pair in data.prices.windows(2) {
            assert_eq!(pair[1][0] - pair[0][0], DAY_MS as f64);
        }
        assert_eq!(data.prices[7][0], now().timestamp_millis() as f64);
    }

    #[test]
    fn test_series_noise_is_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let data = historical_at("ethereum", 365, now(), &mut rng);

        let (low, high) = (3_400.0 * (1.0 - PRICE_NOISE), 3_400.0 * (1.0 + PRICE_NOISE));
        for [_, price] in &data.prices {
            assert!((low..=high).contains(price), "price {price} outside noise band");
        }
    }

    #[test]
    fn test_unknown_coin_series_uses_default_base() {
        let mut rng = StdRng::seed_from_u64(1);
        let data = historical_at("mystery", 1, now(), &mut rng);

        assert_eq!(data.prices.len(), 2);
        assert_eq!(data.coin_id, "mystery");
        assert!(data.prices.iter().all(|[_, p]| (0.95..=1.05).contains(p)));
    }

    #[test]
    fn test_top_coins_truncates() {
        let top = top_coins(3);
        assert!(top.is_fallback);
        assert_eq!(top.coins.len(), 3);
        assert_eq!(top.coins[0].id, "bitcoin");

        assert_eq!(top_coins(250).coins.len(), REFERENCE_COINS.len());
    }

    #[test]
    fn test_trending_and_global() {
        let trending = trending();
        assert!(trending.is_fallback);
        assert_eq!(trending.trending_coins.len(), MAX_TRENDING);
        assert_eq!(trending.trending_coins[6].thumb, "");

        let global = global_stats();
        assert!(global.is_fallback);
        assert!(global.btc_dominance > global.eth_dominance);
    }
}
