//! Collaborator traits.
//!
//! - `store`: cache backends (CacheStore, TaggedCacheStore)
//! - `transport`: the HTTP layer (HttpTransport)
//! - `Translator`: message lookup for validation and API errors

pub mod store;
pub mod transport;

pub use store::*;
pub use transport::*;

/// Looks up a localized message by key, substituting `:name` placeholders.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}
