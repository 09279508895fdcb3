//! In-memory cache stores using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use rajaongkir_core::{
    traits::{CacheStore, TaggedCacheStore},
    Result,
};

/// Writes between full sweeps of expired entries.
const SWEEP_INTERVAL: usize = 256;

/// Stand-in expiry for TTLs that overflow the clock.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Stored value with expiry and tag membership.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    tags: Vec<String>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

fn expiry(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Plain key/value cache.
///
/// Supports exact-key operations and clear-all only; it does not implement
/// [`TaggedCacheStore`].
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    writes: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` holds a fresh value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|e| !e.is_expired())
    }

    /// Drop expired entries.
    pub fn purge_expired(&self) {
        self.entries.retain(|_: &String, e: &mut CacheEntry| !e.is_expired());
    }

    fn read(&self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    fn write(&self, key: &str, value: Value, tags: Vec<String>, ttl: Duration) {
        tracing::trace!(key = key, ttl_secs = ttl.as_secs(), tags = ?tags, "Storing cache entry in memory");
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: expiry(ttl),
                tags,
            },
        );
    }

    /// True once every `SWEEP_INTERVAL` writes.
    fn sweep_due(&self) -> bool {
        self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1
    }

    /// Whether `key` is fresh and carries `tag`. Expired entries are dropped.
    fn live_with_tag(&self, key: &str, tag: &str) -> bool {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return entry.tags.iter().any(|t| t == tag),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        false
    }

    fn has_tag(&self, key: &str, tag: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.tags.iter().any(|t| t == tag))
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read(key))
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.write(key, value, Vec::new(), ttl);
        if self.sweep_due() {
            self.purge_expired();
        }
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// In-memory cache with tag groups.
#[derive(Debug, Default)]
pub struct InMemoryTaggedCache {
    inner: InMemoryCache,
    /// Tag name to the keys written under it.
    index: DashMap<String, HashSet<String>>,
}

impl InMemoryTaggedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Keys currently indexed under `tag`.
    pub fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .index
            .get(tag)
            .map(|set| set.iter().filter(|k| self.inner.has_tag(k, tag)).cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn purge_expired(&self) {
        self.inner.purge_expired();
        self.index.retain(|_: &String, keys: &mut HashSet<String>| {
            keys.retain(|k| self.inner.entries.contains_key(k));
            !keys.is_empty()
        });
    }

    /// Drop keys from the `tag` index that expired or were rewritten without it.
    fn prune_tag(&self, tag: &str) {
        let emptied = match self.index.get_mut(tag) {
            Some(mut keys) => {
                keys.retain(|k| self.inner.live_with_tag(k, tag));
                keys.is_empty()
            }
            None => false,
        };
        if emptied {
            self.index.remove_if(tag, |_, keys| keys.is_empty());
        }
    }

    fn after_write(&self) {
        if self.inner.sweep_due() {
            self.purge_expired();
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryTaggedCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.read(key))
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.inner.write(key, value, Vec::new(), ttl);
        self.after_write();
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        self.inner.entries.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.inner.entries.clear();
        self.index.clear();
        Ok(())
    }
}

#[async_trait]
impl TaggedCacheStore for InMemoryTaggedCache {
    async fn put_tagged(&self, key: &str, value: Value, tags: &[&str], ttl: Duration) -> Result<()> {
        self.inner
            .write(key, value, tags.iter().map(|t| (*t).to_string()).collect(), ttl);
        for tag in tags {
            self.prune_tag(tag);
            self.index
                .entry((*tag).to_string())
                .or_default()
                .insert(key.to_string());
        }
        self.after_write();
        Ok(())
    }

    async fn flush_tag(&self, tag: &str) -> Result<()> {
        let keys = match self.index.remove(tag) {
            Some((_, keys)) => keys,
            None => return Ok(()),
        };

        let mut removed = 0usize;
        for key in keys {
            // The key may have been rewritten without this tag since indexing.
            if self.inner.has_tag(&key, tag) {
                self.inner.entries.remove(&key);
                removed += 1;
            }
        }
        tracing::debug!(tag = tag, removed, "Flushed cache tag");
        Ok(())
    }
}
