//! Metadata Store Module
//!
//! A keyed cache-aside store. Values are shared as `Arc`s and only ever
//! replaced whole, so a reader holding a value never sees it change.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, StoreStatsSnapshot};
use crate::registry::Fetched;

// == Metadata Store ==
#[derive(Debug)]
pub struct MetadataStore<K, V> {
    /// Store name used in logs
    name: &'static str,
    entries: RwLock<HashMap<K, Arc<V>>>,
    stats: CacheStats,
}

impl<K, V> MetadataStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructor ==
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Reads a cached value, counting the hit or miss.
    pub async fn lookup(&self, key: &K) -> Option<Arc<V>> {
        let found = self.entries.read().await.get(key).cloned();
        match &found {
            Some(_) => {
                self.stats.record_hit();
                debug!("{} cache hit: {:?}", self.name, key);
            }
            None => {
                self.stats.record_miss();
                debug!("{} cache miss: {:?}", self.name, key);
            }
        }
        found
    }

    // == Insert ==
    /// Stores a value, replacing any previous one for the key.
    pub async fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.write().await.insert(key, Arc::clone(&value));
        value
    }

    // == Insert Many ==
    /// Stores a batch under a single write lock.
    pub async fn insert_many(&self, items: impl IntoIterator<Item = (K, V)>) -> usize {
        let mut entries = self.entries.write().await;
        let mut count = 0;
        for (key, value) in items {
            entries.insert(key, Arc::new(value));
            count += 1;
        }
        count
    }

    // == Get Or Fetch ==
    /// Cache-aside read.
    ///
    /// On a miss, `fetch` makes one upstream attempt. Not-found and failed
    /// outcomes store `sentinel()` so the same miss is not fetched again.
    /// Concurrent misses for one key may each fetch; the last insert wins.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F, sentinel: fn() -> V) -> Arc<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Fetched<V>>,
    {
        if let Some(value) = self.lookup(&key).await {
            return value;
        }

        let value = match fetch().await {
            Fetched::Found(value) => value,
            Fetched::NotFound => {
                debug!("{} upstream has no entry for {:?}", self.name, key);
                sentinel()
            }
            Fetched::Failed(e) => {
                self.stats.record_upstream_failure();
                warn!("{} fetch failed for {:?}, caching empty value: {e}", self.name, key);
                sentinel()
            }
        };

        self.insert(key, value).await
    }

    // == Clear ==
    /// Drops every entry, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    pub fn record_upstream_failure(&self) {
        self.stats.record_upstream_failure();
    }

    // == Length ==
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Stats ==
    pub async fn stats(&self) -> StoreStatsSnapshot {
        self.stats.snapshot(self.len().await)
    }
}
