//! Time-boxed in-memory response cache.
//!
//! Entries expire `ttl` after insertion, measured against an injected
//! [`Clock`] so expiry can be tested without sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<StdMutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(StdMutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let step = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        if let Ok(mut now) = self.now.lock() {
            *now += step;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}

/// Cache key for one operation call.
pub fn cache_key(operation: &str, variables: &str) -> String {
    format!("{}:{}", operation, variables)
}

struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Cache of provider responses keyed by operation and variables.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>) -> bool {
        let age = self.clock.now().signed_duration_since(stored_at);
        age.num_milliseconds() < self.ttl.as_millis() as i64
    }

    /// Fresh value for `key`, evicting it if expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let fresh = entries.get(key).map(|e| self.is_fresh(e.stored_at))?;
        if fresh {
            debug!("Cache hit for {}", key);
            entries.get(key).map(|e| e.value.clone())
        } else {
            debug!("Cache expired for {}", key);
            entries.remove(key);
            None
        }
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.entries.lock().await.insert(key.into(), entry);
    }

    /// Drop every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| self.is_fresh(e.stored_at));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cache(ttl_secs: u64) -> (ResponseCache<String>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let cache = ResponseCache::new(Duration::from_secs(ttl_secs), Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key("GetSeriesState", "2629390"), "GetSeriesState:2629390");
    }

    #[tokio::test]
    async fn test_hit_before_ttl() {
        let (cache, clock) = cache(300);
        cache.insert("op:1", "payload".to_string()).await;
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("op:1").await.as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn test_expires_at_ttl() {
        let (cache, clock) = cache(300);
        cache.insert("op:1", "payload".to_string()).await;
        clock.advance(Duration::from_secs(300));
        assert!(cache.get("op:1").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_miss_for_unknown_key() {
        let (cache, _) = cache(300);
        assert!(cache.get("op:missing").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (cache, clock) = cache(60);
        cache.insert("old", "a".to_string()).await;
        clock.advance(Duration::from_secs(45));
        cache.insert("new", "b".to_string()).await;
        clock.advance(Duration::from_secs(30));

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("new").await.as_deref(), Some("b"));
    }
}
