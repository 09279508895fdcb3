#![deny(unused)]
//! Cache stores for the RajaOngkir client.
//!
//! - [`InMemoryCache`]: plain key/value, no tag support
//! - [`InMemoryTaggedCache`]: key/value with tag groups
//! - [`RedisCache`]: Redis strings plus one set per tag

pub mod memory;
pub mod redis;

pub use memory::{InMemoryCache, InMemoryTaggedCache};
pub use self::redis::RedisCache;
