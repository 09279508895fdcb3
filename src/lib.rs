#![deny(unused)]
//! RajaOngkir (Komerce) shipping API client.
//!
//! Location lookups, destination search, cost calculation and waybill tracking
//! with validated inputs and tag-aware response caching.
//!
//! ```no_run
//! # async fn run() -> rajaongkir::Result<()> {
//! use rajaongkir::{ClientConfig, SortBy};
//!
//! let client = rajaongkir::build_client(&ClientConfig::new("your-api-key"))?;
//! let provinces = client.get_provinces().await?;
//! let quote = client
//!     .calculate_domestic_cost(501, 574, 1700, ["jne", "tiki"], SortBy::Lowest)
//!     .await?;
//! # let _ = (provinces, quote);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub use rajaongkir_client::{
    configure_tracing, ApiCall, ApiClient, CacheBackend, CacheGateway, CostEndpoint, RajaOngkir,
    ReqwestTransport,
};
pub use rajaongkir_core::*;
pub use rajaongkir_store::{InMemoryCache, InMemoryTaggedCache, RedisCache};

/// Prefix for every key the Redis store writes.
pub const REDIS_KEY_PREFIX: &str = "rajaongkir";

/// Build a client over HTTP with the cache chosen by `config`.
///
/// A configured `redis_url` selects the Redis store; otherwise entries live in
/// process memory. Both support tags.
pub fn build_client(config: &ClientConfig) -> Result<RajaOngkir> {
    config.validate()?;

    let backend = match config.redis_url.as_deref() {
        Some(url) => {
            tracing::info!(url = %url, "Initializing Redis cache store");
            CacheBackend::Tagged(Arc::new(RedisCache::new(url, REDIS_KEY_PREFIX)?))
        }
        None => {
            tracing::info!("Initializing in-memory cache store");
            CacheBackend::Tagged(Arc::new(InMemoryTaggedCache::new()))
        }
    };

    let transport = Arc::new(ReqwestTransport::new(config.request_timeout()));
    tracing::info!(base_url = %config.base_url, locale = %config.locale, "RajaOngkir client ready");

    Ok(RajaOngkir::from_config(config, transport, backend))
}

/// Load [`ClientConfig`] from `config/rajaongkir.*` and `RAJAONGKIR_*`
/// variables, then [`build_client`].
pub fn from_env() -> Result<RajaOngkir> {
    let config = ClientConfig::load()?;
    build_client(&config)
}
