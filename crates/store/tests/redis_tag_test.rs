//! Runs against a live server when `REDIS_URL` is set; skipped otherwise.

use rajaongkir_core::traits::{CacheStore, TaggedCacheStore};
use rajaongkir_store::RedisCache;
use redis::AsyncCommands;
use serde_json::json;
use std::time::Duration;

fn redis_url() -> Option<String> {
    std::env::var("REDIS_URL").ok()
}

#[tokio::test]
async fn test_tag_sets_shrink_and_expire() {
    let Some(url) = redis_url() else {
        return;
    };
    let prefix = format!("rajaongkir-test-{}", std::process::id());
    let cache = RedisCache::new(&url, &prefix).unwrap();
    let tag_key = format!("{}:tag:costs", prefix);

    cache
        .put_tagged("short", json!(1), &["costs"], Duration::from_secs(1))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2100)).await;
    cache
        .put_tagged("long", json!(2), &["costs"], Duration::from_secs(60))
        .await
        .unwrap();

    let mut conn = redis::Client::open(url.as_str())
        .unwrap()
        .get_multiplexed_async_connection()
        .await
        .unwrap();
    let members: Vec<String> = conn.zrange(&tag_key, 0, -1).await.unwrap();
    assert_eq!(members, vec![format!("{}:long", prefix)]);

    let ttl: i64 = conn.ttl(&tag_key).await.unwrap();
    assert!(ttl > 0 && ttl <= 61, "tag set ttl was {}", ttl);

    cache.flush_tag("costs").await.unwrap();
    assert!(cache.get("long").await.unwrap().is_none());
    cache.flush().await.unwrap();
}
