//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL expiration
//! and per-key request coalescing.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{ApiError, Result};

/// Shared handle to a fetch running on the runtime.
type InflightFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

// == Cache Status ==
/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fresh entry, no upstream work
    Hit,
    /// This caller started the upstream fetch
    Miss,
    /// Joined a fetch another caller already started
    Coalesced,
}

impl CacheStatus {
    pub fn is_hit(self) -> bool {
        self == CacheStatus::Hit
    }

    /// Folds the status of a further lookup into an aggregate one.
    ///
    /// A composite operation is a hit only if every lookup it made was a hit.
    pub fn combine(self, other: CacheStatus) -> CacheStatus {
        if self.is_hit() && other.is_hit() {
            CacheStatus::Hit
        } else {
            CacheStatus::Miss
        }
    }

    /// Value for the `X-Cache` response header.
    pub fn header_value(self) -> &'static str {
        if self.is_hit() {
            "HIT"
        } else {
            "MISS"
        }
    }
}

// == Store State ==
struct StoreState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    lru: LruTracker<K>,
    stats: CacheStats,
    inflight: HashMap<K, InflightFetch<V>>,
    max_entries: usize,
}

impl<K, V> StoreState<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Returns a fresh value, dropping the entry if it has expired.
    fn lookup(&mut self, key: &K) -> Option<V> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn put(&mut self, key: K, value: V, ttl: Duration) -> Option<K> {
        let mut evicted = None;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
        evicted
    }
}

// == Cache Store ==
/// Concurrent TTL cache with LRU-bounded capacity and get-or-compute semantics.
///
/// Cloning the store clones the handle; all clones share the same entries.
pub struct CacheStore<K, V> {
    name: &'static str,
    state: Arc<Mutex<StoreState<K, V>>>,
}

impl<K, V> Clone for CacheStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new store holding at most `max_entries` entries.
    ///
    /// A capacity of zero is raised to one so a freshly computed value can
    /// always be stored.
    pub fn new(name: &'static str, max_entries: usize) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(StoreState {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
                inflight: HashMap::new(),
                max_entries: max_entries.max(1),
            })),
        }
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, or runs `compute` to produce it.
    ///
    /// Concurrent callers for the same missing key share a single invocation of
    /// `compute`. The fetch runs as its own task: callers that stop waiting do
    /// not cancel it, and a successful result is stored for `ttl` either way.
    /// Errors are handed to every waiting caller and never cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        compute: F,
    ) -> Result<(V, CacheStatus)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (fetch, status) = {
            let mut state = self.state.lock().await;

            if let Some(value) = state.lookup(&key) {
                state.stats.record_hit();
                return Ok((value, CacheStatus::Hit));
            }

            // A completed handle left behind by a panicked task is not joinable
            let running = state
                .inflight
                .get(&key)
                .filter(|fetch| fetch.peek().is_none())
                .cloned();

            match running {
                Some(fetch) => {
                    state.stats.record_coalesced();
                    debug!(cache = self.name, key = ?key, "joining in-flight fetch");
                    (fetch, CacheStatus::Coalesced)
                }
                None => {
                    state.stats.record_miss();
                    debug!(cache = self.name, key = ?key, "cache miss, fetching");
                    let fetch = self.spawn_fetch(key.clone(), ttl, compute());
                    state.inflight.insert(key, fetch.clone());
                    (fetch, CacheStatus::Miss)
                }
            }
        };

        fetch.await.map(|value| (value, status))
    }

    /// Runs `fut` on the runtime and stores its successful output.
    ///
    /// Must be called with the state lock held so the in-flight marker is
    /// registered before the task can clear it.
    fn spawn_fetch<Fut>(&self, key: K, ttl: Duration, fut: Fut) -> InflightFetch<V>
    where
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let name = self.name;

        let handle = tokio::spawn(async move {
            let result = fut.await;
            let mut guard = state.lock().await;
            guard.inflight.remove(&key);
            match &result {
                Ok(value) => {
                    if let Some(evicted) = guard.put(key, value.clone(), ttl) {
                        debug!(cache = name, evicted = ?evicted, "evicted least recently used entry");
                    }
                }
                Err(err) => debug!(cache = name, key = ?key, error = %err, "fetch failed, not caching"),
            }
            result
        });

        async move {
            handle.await.unwrap_or_else(|err| {
                Err(ApiError::Upstream(format!("{name} fetch task failed: {err}")))
            })
        }
        .boxed()
        .shared()
    }

    // == Get ==
    /// Retrieves a fresh value by key without computing anything.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock().await;
        let value = state.lookup(key);
        if value.is_some() {
            state.stats.record_hit();
        } else {
            state.stats.record_miss();
        }
        value
    }

    // == Insert ==
    /// Stores a value directly, replacing any existing entry and resetting its TTL.
    pub async fn insert(&self, key: K, value: V, ttl: Duration) {
        let mut state = self.state.lock().await;
        state.put(key, value, ttl);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let expired_keys: Vec<K> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            state.entries.remove(key);
            state.lru.remove(key);
        }

        let remaining = state.entries.len();
        state.stats.set_total_entries(remaining);
        expired_keys.len()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
