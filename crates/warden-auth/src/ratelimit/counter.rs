//! Fixed-window failure counter.

use std::time::Duration;

use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

/// Count one failure under `key` and return the new total.
///
/// The window starts at the first failure: the expiry is set only when the
/// increment produced 1, so later hits never extend it.
pub async fn record_failure(
    store: &dyn CounterStore,
    key: &str,
    window: Duration,
) -> AppResult<i64> {
    let count = store.incr(key).await?;
    if count == 1 {
        store.expire(key, window).await?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_cache::memory::MemoryCounterStore;
    use warden_core::config::cache::MemoryCacheConfig;

    #[tokio::test(start_paused = true)]
    async fn test_window_is_not_extended_by_later_failures() {
        let store = MemoryCounterStore::new(&MemoryCacheConfig::default());
        let window = Duration::from_secs(60);

        assert_eq!(record_failure(&store, "attempts:ip:a", window).await.unwrap(), 1);
        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(record_failure(&store, "attempts:ip:a", window).await.unwrap(), 2);
        assert_eq!(
            store.ttl("attempts:ip:a").await.unwrap(),
            Some(Duration::from_secs(10))
        );

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(record_failure(&store, "attempts:ip:a", window).await.unwrap(), 1);
    }
}
