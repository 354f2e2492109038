//! Core cache implementation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::trace;

use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Thread-safe cache mapping string keys to `(value, absolute expiry)`.
///
/// # Type Parameters
/// - `V`: value type (must be `Clone`; reads hand out copies)
/// - `C`: clock used for expiry checks (defaults to [`SystemClock`])
///
/// Expired entries are pruned lazily on access. There is no size bound: the
/// key space is small and every entry expires.
pub struct TtlCache<V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    storage: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    metrics: MetricsCollector,
    clock: C,
}

impl<V> TtlCache<V, SystemClock>
where
    V: Clone,
{
    /// Create a cache using the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V> Default for TtlCache<V, SystemClock>
where
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> TtlCache<V, C>
where
    V: Clone,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing expiry).
    pub fn with_clock(clock: C) -> Self {
        Self { storage: Arc::new(RwLock::new(HashMap::new())), metrics: MetricsCollector::new(), clock }
    }

    /// Insert a value that expires at an absolute instant.
    ///
    /// An existing entry under the same key is replaced, whatever its
    /// remaining lifetime.
    pub fn insert_until(&self, key: String, value: V, expires_at: DateTime<Utc>) {
        let mut storage = self.storage.write();
        storage.insert(key, CacheEntry { value, expires_at });
        self.metrics.record_insert();
    }

    /// Insert a value that expires `ttl` from now.
    pub fn insert_for(&self, key: String, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.insert_until(key, value, expires_at);
    }

    /// Get a value, or `None` if the key is absent or the entry expired.
    ///
    /// Expired entries are removed as a side effect.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        {
            let storage = self.storage.read();
            match storage.get(key) {
                Some(entry) if entry.expires_at > now => {
                    self.metrics.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.metrics.record_miss();
                    return None;
                }
            }
        }

        // Entry exists but expired: prune under the write lock. Re-check the
        // expiry since another writer may have refreshed it in between.
        let mut storage = self.storage.write();
        if let Some(entry) = storage.get(key) {
            if entry.expires_at > now {
                self.metrics.record_hit();
                return Some(entry.value.clone());
            }
            trace!(key, "evicting expired cache entry");
            storage.remove(key);
        }
        self.metrics.record_miss();
        None
    }

    /// Whether a non-expired entry exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        let storage = self.storage.read();
        storage.get(key).is_some_and(|entry| entry.expires_at > now)
    }

    /// Remove an entry regardless of its expiry.
    pub fn invalidate(&self, key: &str) {
        let mut storage = self.storage.write();
        if storage.remove(key).is_some() {
            self.metrics.record_invalidation();
        }
    }

    /// Remove every entry whose key starts with any of the given prefixes.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefixes<S: AsRef<str>>(&self, prefixes: &[S]) -> usize {
        let mut storage = self.storage.write();
        let before = storage.len();
        storage.retain(|key, _| !prefixes.iter().any(|p| key.starts_with(p.as_ref())));
        let removed = before - storage.len();
        for _ in 0..removed {
            self.metrics.record_invalidation();
        }
        removed
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.storage.write().clear();
    }

    /// Number of entries currently stored, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.storage.read().is_empty()
    }

    /// Snapshot of hit/miss/insert counters.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }
}

impl<V, C> Clone for TtlCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
