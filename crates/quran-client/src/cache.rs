//! Time-bounded in-memory response cache.
//!
//! Entries are keyed by request path and expire after a fixed TTL.
//! The cache holds at most `capacity` entries; a full cache first drops
//! expired entries, then the oldest one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Default freshness window for cached responses.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;
/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 256;

struct CacheSlot<V> {
    value: Arc<V>,
    stored_at: DateTime<Utc>,
}

pub struct ResponseCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheSlot<V>>>,
}

impl<V> ResponseCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, or run `producer` and cache its result.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, producer: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get_or_fetch_at(key, Utc::now(), producer).await
    }

    /// Same as [`Self::get_or_fetch`] with an explicit clock reading.
    ///
    /// Failed producers are not cached.
    pub async fn get_or_fetch_at<F, Fut, E>(
        &self,
        key: &str,
        now: DateTime<Utc>,
        producer: F,
    ) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.lookup(key, now) {
            tracing::trace!(key, "Cache hit");
            return Ok(hit);
        }

        tracing::debug!(key, "Cache miss, fetching");
        let value = Arc::new(producer().await?);
        self.store(key, Arc::clone(&value), now);
        Ok(value)
    }

    fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<Arc<V>> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|slot| now - slot.stored_at < self.ttl)
            .map(|slot| Arc::clone(&slot.value))
    }

    fn store(&self, key: &str, value: Arc<V>, now: DateTime<Utc>) {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!(key, "Cache lock poisoned, skipping store");
            return;
        };

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, slot| now - slot.stored_at < ttl);

            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, slot)| slot.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    tracing::debug!(evicted = %oldest, "Cache full, evicting oldest entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key.to_string(),
            CacheSlot {
                value,
                stored_at: now,
            },
        );
    }

    /// Drop a single entry.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of cached entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS), DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    async fn fetch_counted(
        cache: &ResponseCache<String>,
        key: &str,
        now: DateTime<Utc>,
        calls: &AtomicUsize,
    ) -> Arc<String> {
        cache
            .get_or_fetch_at(key, now, move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, ()>(format!("{key}#{n}"))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn returns_cached_value_within_ttl() {
        let cache = ResponseCache::default();
        let calls = AtomicUsize::new(0);

        let first = fetch_counted(&cache, "surat", t0(), &calls).await;
        let second = fetch_counted(&cache, "surat", t0() + Duration::minutes(59), &calls).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refetches_after_expiry() {
        let cache = ResponseCache::default();
        let calls = AtomicUsize::new(0);

        let first = fetch_counted(&cache, "surat", t0(), &calls).await;
        let second = fetch_counted(&cache, "surat", t0() + Duration::hours(1), &calls).await;

        assert_eq!(*first, "surat#1");
        assert_eq!(*second, "surat#2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache: ResponseCache<String> = ResponseCache::default();

        let err = cache
            .get_or_fetch_at("k", t0(), || async { Err::<String, _>("down") })
            .await;
        assert_eq!(err.unwrap_err(), "down");
        assert!(cache.is_empty());

        let ok = cache
            .get_or_fetch_at("k", t0(), || async { Ok::<_, &str>("up".to_string()) })
            .await
            .unwrap();
        assert_eq!(*ok, "up");
    }

    #[tokio::test]
    async fn capacity_evicts_oldest() {
        let cache = ResponseCache::new(Duration::hours(1), 2);
        let calls = AtomicUsize::new(0);

        fetch_counted(&cache, "a", t0(), &calls).await;
        fetch_counted(&cache, "b", t0() + Duration::seconds(1), &calls).await;
        fetch_counted(&cache, "c", t0() + Duration::seconds(2), &calls).await;
        assert_eq!(cache.len(), 2);

        // "a" was evicted, so asking again triggers a new fetch.
        let again = fetch_counted(&cache, "a", t0() + Duration::seconds(3), &calls).await;
        assert_eq!(*again, "a#4");
    }

    #[tokio::test]
    async fn invalidate_and_clear() {
        let cache = ResponseCache::default();
        let calls = AtomicUsize::new(0);

        fetch_counted(&cache, "a", t0(), &calls).await;
        fetch_counted(&cache, "b", t0(), &calls).await;
        cache.invalidate("a");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
