//! Cache key generation per data category.

/// Key for global market aggregates.
pub const GLOBAL_KEY: &str = "global";

/// Key for the trending list.
pub const TRENDING_KEY: &str = "trending";

/// Key for a coin's spot price.
pub fn price_key(coin_id: &str) -> String {
    format!("price:{coin_id}")
}

/// Key for a coin's price history over `days`.
pub fn historical_key(coin_id: &str, days: u32) -> String {
    format!("historical:{coin_id}:{days}")
}

/// Key for the market-cap ranking truncated to `limit`.
pub fn top_coins_key(limit: u16) -> String {
    format!("top_coins:{limit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(price_key("bitcoin"), "price:bitcoin");
        assert_eq!(historical_key("ethereum", 30), "historical:ethereum:30");
        assert_eq!(top_coins_key(10), "top_coins:10");
    }

    #[test]
    fn test_historical_key_varies_by_days() {
        assert_ne!(historical_key("bitcoin", 7), historical_key("bitcoin", 30));
    }
}
