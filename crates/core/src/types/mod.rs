//! Core type definitions for the RajaOngkir client.
//!
//! Broken down into submodules by concern.

pub mod cache;
pub mod cost;
pub mod http;
pub mod location;

pub use cache::*;
pub use cost::*;
pub use http::*;
pub use location::*;
