//! Tag-aware cache gateway.
//!
//! Wraps either a tag-capable store or a plain one. Which of the two is in use
//! is fixed when the gateway is built; every later operation branches on that
//! choice instead of probing the store.
//!
//! In plain mode a tag cannot be flushed selectively. Invalidating a tag then
//! forgets only the keys registered for it with
//! [`CacheGateway::register_static_key`]; everything else under the tag stays
//! until its TTL runs out.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rajaongkir_core::{
    traits::{CacheStore, TaggedCacheStore},
    types::{CacheMode, CacheTag},
    Result,
};

/// The store behind a [`CacheGateway`].
#[derive(Clone)]
pub enum CacheBackend {
    Tagged(Arc<dyn TaggedCacheStore>),
    Plain(Arc<dyn CacheStore>),
}

impl CacheBackend {
    pub fn mode(&self) -> CacheMode {
        match self {
            CacheBackend::Tagged(_) => CacheMode::Tagging,
            CacheBackend::Plain(_) => CacheMode::Plain,
        }
    }
}

impl From<Arc<dyn TaggedCacheStore>> for CacheBackend {
    fn from(store: Arc<dyn TaggedCacheStore>) -> Self {
        CacheBackend::Tagged(store)
    }
}

impl From<Arc<dyn CacheStore>> for CacheBackend {
    fn from(store: Arc<dyn CacheStore>) -> Self {
        CacheBackend::Plain(store)
    }
}

/// Remember-style access to the cache with tag-based invalidation.
#[derive(Clone)]
pub struct CacheGateway {
    backend: CacheBackend,
    static_keys: Vec<(String, Vec<CacheTag>)>,
}

impl CacheGateway {
    pub fn new(backend: CacheBackend) -> Self {
        tracing::debug!(mode = ?backend.mode(), "Cache gateway initialized");
        Self {
            backend,
            static_keys: Vec::new(),
        }
    }

    pub fn tagged(store: Arc<dyn TaggedCacheStore>) -> Self {
        Self::new(CacheBackend::Tagged(store))
    }

    pub fn plain(store: Arc<dyn CacheStore>) -> Self {
        Self::new(CacheBackend::Plain(store))
    }

    pub fn mode(&self) -> CacheMode {
        self.backend.mode()
    }

    /// Record a fixed key so that plain-mode invalidation of any of `tags`
    /// can still forget it.
    pub fn register_static_key(&mut self, key: impl Into<String>, tags: &[CacheTag]) {
        let key = key.into();
        match self.static_keys.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                for tag in tags {
                    if !existing.contains(tag) {
                        existing.push(*tag);
                    }
                }
            }
            None => self.static_keys.push((key, tags.to_vec())),
        }
    }

    /// Return the cached value under `key`, or run `compute` and store its
    /// result for `ttl`.
    ///
    /// Errors from `compute` are returned and nothing is stored. A zero `ttl`
    /// computes without storing.
    pub async fn remember_with_tags<F, Fut>(
        &self,
        key: &str,
        tags: &[CacheTag],
        ttl: Duration,
        compute: F,
    ) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(value) = self.get(key).await? {
            tracing::debug!(key = key, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(key = key, "Cache miss");
        let value = compute().await?;

        if ttl.is_zero() {
            return Ok(value);
        }

        match &self.backend {
            CacheBackend::Tagged(store) => {
                let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
                store.put_tagged(key, value.clone(), &names, ttl).await?;
            }
            CacheBackend::Plain(store) => store.put(key, value.clone(), ttl).await?,
        }

        Ok(value)
    }

    /// Invalidate every entry carrying `tag`.
    pub async fn invalidate_tag(&self, tag: CacheTag) -> Result<()> {
        match &self.backend {
            CacheBackend::Tagged(store) => {
                store.flush_tag(tag.as_str()).await?;
                tracing::info!(tag = %tag, "Cache tag flushed");
            }
            CacheBackend::Plain(store) => {
                let keys: Vec<&str> = self
                    .static_keys
                    .iter()
                    .filter(|(_, tags)| tags.contains(&tag))
                    .map(|(key, _)| key.as_str())
                    .collect();

                for key in &keys {
                    store.forget(key).await?;
                }

                tracing::warn!(
                    tag = %tag,
                    forgotten = keys.len(),
                    "Cache store has no tag support; other entries expire by TTL"
                );
            }
        }
        Ok(())
    }

    pub async fn invalidate_key(&self, key: &str) -> Result<()> {
        match &self.backend {
            CacheBackend::Tagged(store) => store.forget(key).await,
            CacheBackend::Plain(store) => store.forget(key).await,
        }
    }

    /// Flush `tags` in tagged mode, or the whole store in plain mode.
    pub async fn flush_all(&self, tags: &[CacheTag]) -> Result<()> {
        match &self.backend {
            CacheBackend::Tagged(store) => {
                for tag in tags {
                    store.flush_tag(tag.as_str()).await?;
                }
            }
            CacheBackend::Plain(store) => {
                tracing::warn!("Flushing entire cache store");
                store.flush().await?;
            }
        }
        tracing::info!(tags = ?tags, "Cache cleared");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match &self.backend {
            CacheBackend::Tagged(store) => store.get(key).await,
            CacheBackend::Plain(store) => store.get(key).await,
        }
    }
}
