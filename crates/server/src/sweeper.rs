//! Periodic removal of long-expired cache entries.

use cryptotrack_core::TtlCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a task that purges entries older than `max_age` every `interval`.
pub fn spawn(cache: Arc<TtlCache>, interval: Duration, max_age: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = cache.purge_older_than(max_age).await;
            if removed > 0 {
                tracing::debug!(removed, "purged expired cache entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_old_entries() {
        let cache = Arc::new(TtlCache::new());
        cache.set("price:bitcoin", json!(1)).await;

        let handle = spawn(cache.clone(), Duration::from_secs(60), Duration::from_secs(90));

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(cache.len().await, 1);

        cache.set("global", json!(2)).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("global", Duration::from_secs(600)).await.is_some());

        handle.abort();
    }
}
