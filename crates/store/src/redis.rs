//! Redis implementation of TaggedCacheStore.
//!
//! Values are stored as JSON strings under `<prefix>:<key>` with `SET EX`.
//! Each tag is a sorted set `<prefix>:tag:<tag>` of the full keys written
//! under it, scored by their expiry in Unix seconds. Every tagged write drops
//! members that have already expired and moves the set's own expiry to its
//! latest member, so tag sets never outlive the entries they index.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Script};
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rajaongkir_core::{
    traits::{CacheStore, TaggedCacheStore},
    Error, Result,
};

/// Upper bound on any TTL sent to Redis: ten years.
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

// KEYS[1] = entry, KEYS[2..] = tag sets
// ARGV = value, ttl secs, now, expires at
const PUT_TAGGED_SCRIPT: &str = r#"
redis.call('SET', KEYS[1], ARGV[1], 'EX', ARGV[2])
for i = 2, #KEYS do
    redis.call('ZREMRANGEBYSCORE', KEYS[i], '-inf', ARGV[3])
    redis.call('ZADD', KEYS[i], ARGV[4], KEYS[1])
    local latest = redis.call('ZRANGE', KEYS[i], -1, -1, 'WITHSCORES')
    redis.call('EXPIREAT', KEYS[i], latest[2])
end
return 1
"#;

/// Redis-backed cache.
pub struct RedisCache {
    client: Client,
    prefix: String,
    put_tagged: Script,
}

impl RedisCache {
    /// Create a new Redis cache. No connection is made until first use.
    pub fn new(url: &str, prefix: &str) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| Error::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
            put_tagged: Script::new(PUT_TAGGED_SCRIPT),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn tag_key(&self, tag: &str) -> String {
        format!("{}:tag:{}", self.prefix, tag)
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::cache(format!("Redis connection error: {}", e)))
    }
}

/// Redis rejects `EX 0` and expiries past its clock range.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().clamp(1, MAX_TTL_SECS)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut conn = self.connection().await?;

        let data: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(|e| Error::cache(format!("Redis get error: {}", e)))?;

        match data {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .map_err(|e| Error::cache(format!("Failed to deserialize cache entry: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .set_ex(self.key(key), value.to_string(), ttl_secs(ttl))
            .await
            .map_err(|e| Error::cache(format!("Redis set error: {}", e)))?;

        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .del(self.key(key))
            .await
            .map_err(|e| Error::cache(format!("Redis delete error: {}", e)))?;

        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        let pattern = format!("{}:*", self.prefix);
        let keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .map_err(|e| Error::cache(format!("Redis keys error: {}", e)))?;

        if keys.is_empty() {
            return Ok(());
        }

        let _: () = conn
            .del(keys)
            .await
            .map_err(|e| Error::cache(format!("Redis delete error: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl TaggedCacheStore for RedisCache {
    async fn put_tagged(&self, key: &str, value: Value, tags: &[&str], ttl: Duration) -> Result<()> {
        let mut conn = self.connection().await?;
        let secs = ttl_secs(ttl);
        let now = unix_now();

        let mut invocation = self.put_tagged.key(self.key(key));
        for tag in tags {
            invocation.key(self.tag_key(tag));
        }
        invocation
            .arg(value.to_string())
            .arg(secs)
            .arg(now)
            .arg(now.saturating_add(secs));

        let _: i64 = invocation
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Error::cache(format!("Redis tagged set error: {}", e)))?;

        Ok(())
    }

    async fn flush_tag(&self, tag: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let tag_key = self.tag_key(tag);

        let mut keys: Vec<String> = conn
            .zrange(&tag_key, 0, -1)
            .await
            .map_err(|e| Error::cache(format!("Redis zrange error: {}", e)))?;

        tracing::debug!(tag = tag, count = keys.len(), "Flushing Redis cache tag");

        keys.push(tag_key);
        let _: () = conn
            .del(keys)
            .await
            .map_err(|e| Error::cache(format!("Redis delete error: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let cache = RedisCache::new("redis://127.0.0.1:6379", "ongkir").unwrap();
        assert_eq!(cache.key("rajaongkir.provinces"), "ongkir:rajaongkir.provinces");
        assert_eq!(cache.tag_key("rajaongkir.costs"), "ongkir:tag:rajaongkir.costs");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(RedisCache::new("not-a-url", "p"), Err(Error::Cache(_))));
    }

    #[test]
    fn test_ttl_bounds() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(3600)), 3600);
        assert_eq!(ttl_secs(Duration::from_secs(u64::MAX)), MAX_TTL_SECS);
    }
}
