#![deny(unused)]
//! RajaOngkir API client.
//!
//! [`RajaOngkir`] is the entry point. It validates cost queries, derives cache
//! keys, serves repeated lookups from a [`CacheGateway`], and forwards misses
//! to the remote API through an [`ApiClient`].

pub mod api;
pub mod cache_gateway;
pub mod client;
pub mod http;
pub mod telemetry;

pub use api::{ApiCall, ApiClient};
pub use cache_gateway::{CacheBackend, CacheGateway};
pub use client::{CostEndpoint, RajaOngkir};
pub use http::ReqwestTransport;
pub use telemetry::configure_tracing;
