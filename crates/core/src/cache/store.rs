//! TTL cache store.

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// Cached value with the instant it was written.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// In-memory key/value cache with caller-supplied TTLs.
///
/// Backed by a moka cache with LRU eviction when bounded. Share it through
/// an `Arc`; every handler task reads and writes the same map. Concurrent
/// misses on one key are not coalesced, so both callers may refresh it; the
/// later write wins.
pub struct TtlCache<V = Value> {
    entries: Cache<String, CacheEntry<V>>,
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.entry_count())
            .field("max_entries", &self.entries.policy().max_capacity())
            .finish()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create an unbounded cache.
    pub fn new() -> Self {
        Self { entries: Cache::builder().build() }
    }

    /// Create a cache holding at most `max_entries` keys.
    ///
    /// A bound of 0 means unbounded. Once full, the least recently used entry
    /// is evicted.
    pub fn with_max_entries(max_entries: usize) -> Self {
        if max_entries == 0 {
            return Self::new();
        }
        let entries = Cache::builder()
            .max_capacity(max_entries as u64)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { entries }
    }

    /// Return the value for `key` if it was stored less than `ttl` ago.
    pub async fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        self.entries
            .get(key)
            .await
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.value)
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.entries
            .insert(key.into(), CacheEntry { value, stored_at: Instant::now() })
            .await;
    }

    /// Remove every entry stored `age` or longer ago.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_older_than(&self, age: Duration) -> usize {
        let expired: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(age))
            .map(|(key, _)| key)
            .collect();

        for key in &expired {
            self.entries.invalidate(key.as_str()).await;
        }
        expired.len()
    }

    /// Number of stored entries, fresh or not.
    ///
    /// Flushes pending evictions first so the count is exact.
    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop all entries.
    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }
}

impl<V: Clone + Send + Sync + 'static> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::time::advance;

    const TTL: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_and_miss_after() {
        let cache = TtlCache::new();
        cache.set("price:bitcoin", json!({"current_price": 100})).await;

        advance(Duration::from_secs(10)).await;
        let hit = cache.get("price:bitcoin", TTL).await;
        assert_eq!(hit, Some(json!({"current_price": 100})));

        advance(Duration::from_secs(21)).await;
        assert!(cache.get("price:bitcoin", TTL).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_boundary_is_exclusive() {
        let cache = TtlCache::new();
        cache.set("global", json!({"markets": 1})).await;

        advance(Duration::from_secs(30)).await;
        assert!(cache.get("global", TTL).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_read_does_not_evict() {
        let cache = TtlCache::new();
        cache.set("trending", json!([1, 2, 3])).await;

        advance(Duration::from_secs(120)).await;
        assert!(cache.get("trending", TTL).await.is_none());
        assert_eq!(cache.len().await, 1);

        // A wider window still sees the old value.
        assert!(cache.get("trending", Duration::from_secs(300)).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_is_per_call() {
        let cache = TtlCache::new();
        cache.set("historical:bitcoin:7", json!({"days": 7})).await;

        advance(Duration::from_secs(60)).await;
        assert!(cache.get("historical:bitcoin:7", Duration::from_secs(30)).await.is_none());
        assert!(cache.get("historical:bitcoin:7", Duration::from_secs(300)).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_set_is_idempotent() {
        let cache = TtlCache::new();
        for _ in 0..5 {
            cache.set("price:ethereum", json!({"current_price": 3000})).await;
        }

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("price:ethereum", TTL).await, Some(json!({"current_price": 3000})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_timestamp() {
        let cache = TtlCache::new();
        cache.set("price:bitcoin", json!(1)).await;

        advance(Duration::from_secs(25)).await;
        cache.set("price:bitcoin", json!(2)).await;

        advance(Duration::from_secs(25)).await;
        assert_eq!(cache.get("price:bitcoin", TTL).await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache: TtlCache = TtlCache::new();
        assert!(cache.get("nope", TTL).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_evicts_least_recently_used() {
        let cache = TtlCache::with_max_entries(2);
        cache.set("a", json!(1)).await;
        cache.set("b", json!(2)).await;
        cache.len().await;
        cache.set("c", json!(3)).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("a", TTL).await.is_none());
        assert!(cache.get("c", TTL).await.is_some());
    }

    #[tokio::test]
    async fn test_bound_holds_under_many_inserts() {
        let cache = TtlCache::with_max_entries(10);
        for i in 0..500 {
            cache.set(format!("price:coin-{i}"), json!(i)).await;
        }

        assert_eq!(cache.len().await, 10);
        assert_eq!(cache.get("price:coin-499", TTL).await, Some(json!(499)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_allows_overwrite_when_full() {
        let cache = TtlCache::with_max_entries(2);
        cache.set("a", json!(1)).await;
        advance(Duration::from_millis(10)).await;
        cache.set("b", json!(2)).await;
        cache.set("a", json!(10)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a", TTL).await, Some(json!(10)));
        assert_eq!(cache.get("b", TTL).await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_zero_bound_is_unbounded() {
        let cache = TtlCache::with_max_entries(0);
        for i in 0..50 {
            cache.set(format!("k{i}"), json!(i)).await;
        }
        assert_eq!(cache.len().await, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_older_than() {
        let cache = TtlCache::new();
        cache.set("old", json!(1)).await;
        advance(Duration::from_secs(700)).await;
        cache.set("new", json!(2)).await;

        let removed = cache.purge_older_than(Duration::from_secs(600)).await;
        assert_eq!(removed, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("new", TTL).await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = TtlCache::new();
        cache.set("a", json!(1)).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
