#![deny(unused)]
//! Core types, traits, and error definitions for the RajaOngkir client.
//!
//! This crate provides the building blocks shared by the cache stores and the
//! client facade: the courier registry, request validation, cache key
//! derivation, configuration, and the collaborator traits.

pub mod cache_key;
pub mod config;
pub mod courier;
pub mod error;
pub mod i18n;
pub mod mocks;
pub mod traits;
pub mod types;
pub mod validation;

pub use cache_key::KeyDeriver;
pub use config::ClientConfig;
pub use courier::Courier;
pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use i18n::{Catalog, Locale};
pub use traits::*;
pub use types::*;
pub use validation::{CostValidator, ValidationCode, ValidationError, ValidationErrors};
