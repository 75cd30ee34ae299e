//! Expiring JSON cache.
//!
//! Each value is stored as `{"data": <T>, "expiry": <epoch ms>}`. An entry is
//! served while `now <= expiry` and dropped on the first read after that.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::CACHE_FILE;
use crate::error::StoreError;
use crate::local::KeyValueStore;

/// Wall-clock source in epoch milliseconds.
pub trait Clock: Send {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub expiry: i64,
}

#[derive(Deserialize)]
struct ExpiryOnly {
    expiry: i64,
}

pub struct ExpiringCache {
    store: KeyValueStore,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("entries", &self.store.len())
            .field("path", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl ExpiringCache {
    #[must_use]
    pub fn new(store: KeyValueStore, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// `<data_dir>/cache.json` on the system clock.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(
            KeyValueStore::open(data_dir.join(CACHE_FILE))?,
            Box::new(SystemClock),
        ))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(KeyValueStore::in_memory(), Box::new(SystemClock))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        data: &T,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let entry = CacheEntry {
            data,
            expiry: self.clock.now_ms().saturating_add(ttl_ms),
        };
        self.store.set_json(key, &entry)
    }

    /// Fresh data for `key`, or `None`. Expired and unreadable entries are
    /// removed.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        let now = self.clock.now_ms();

        match serde_json::from_str::<CacheEntry<T>>(raw) {
            Ok(entry) if now <= entry.expiry => return Some(entry.data),
            Ok(_) => tracing::debug!(key, "Cache entry expired"),
            Err(e) => tracing::warn!(key, "Dropping unreadable cache entry: {e}"),
        }

        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, "Failed to remove cache entry: {e}");
        }
        None
    }

    /// Drop every expired or unreadable entry. Returns how many were removed.
    pub fn purge_expired(&mut self) -> Result<usize, StoreError> {
        let now = self.clock.now_ms();
        self.store.retain(|_, raw| {
            serde_json::from_str::<ExpiryOnly>(raw).is_ok_and(|entry| now <= entry.expiry)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    #[derive(Clone)]
    struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        fn at(ms: i64) -> Self {
            Self(Arc::new(AtomicI64::new(ms)))
        }

        fn set(&self, ms: i64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn cache_at(ms: i64) -> (ExpiringCache, ManualClock) {
        let clock = ManualClock::at(ms);
        let cache = ExpiringCache::new(KeyValueStore::in_memory(), Box::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn stores_data_with_expiry() {
        let (mut cache, _) = cache_at(1_000);
        cache
            .set("popular:ko-KR:1", &vec![1, 2, 3], Duration::from_millis(500))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(cache.store.get("popular:ko-KR:1").unwrap()).unwrap();
        assert_eq!(raw["expiry"], 1_500);
        assert_eq!(raw["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn entry_is_served_up_to_and_including_expiry() {
        let (mut cache, clock) = cache_at(0);
        cache.set("k", "v", Duration::from_millis(100)).unwrap();

        clock.set(100);
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));

        clock.set(101);
        assert_eq!(cache.get::<String>("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn unreadable_entry_is_removed() {
        let (mut cache, _) = cache_at(0);
        cache.store.set("k", "garbage").unwrap();
        assert_eq!(cache.get::<String>("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn wrong_shape_is_a_miss() {
        let (mut cache, _) = cache_at(0);
        cache.set("k", &42, Duration::from_secs(1)).unwrap();
        assert_eq!(cache.get::<Vec<String>>("k"), None);
    }

    #[test]
    fn purge_drops_only_stale_entries() {
        let (mut cache, clock) = cache_at(0);
        cache.set("short", &1, Duration::from_millis(10)).unwrap();
        cache.set("long", &2, Duration::from_secs(60)).unwrap();

        clock.set(11);
        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.get::<i32>("long"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cache = ExpiringCache::open(dir.path()).unwrap();
            cache.set("k", "v", Duration::from_secs(60)).unwrap();
        }
        let mut cache = ExpiringCache::open(dir.path()).unwrap();
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));
    }
}
