//! Cache store traits.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// Key/value cache with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a fresh value. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value for `ttl`, replacing any previous entry.
    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Remove one entry. Missing keys are not an error.
    async fn forget(&self, key: &str) -> Result<()>;

    /// Remove every entry owned by this store.
    async fn flush(&self) -> Result<()>;
}

/// Cache that can group entries under tags.
#[async_trait]
pub trait TaggedCacheStore: CacheStore {
    /// Store a value and associate it with every tag in `tags`.
    async fn put_tagged(&self, key: &str, value: Value, tags: &[&str], ttl: Duration) -> Result<()>;

    /// Remove every entry associated with `tag`.
    async fn flush_tag(&self, tag: &str) -> Result<()>;
}
