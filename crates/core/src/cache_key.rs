//! Cache key derivation.
//!
//! Keys are `<prefix>.<namespace>` followed by one `.<name>_<value>` segment
//! per parameter, with parameters ordered by name so that call-site argument
//! order never changes the key.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const DEFAULT_PREFIX: &str = "rajaongkir";

/// Builds deterministic cache keys.
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    prefix: String,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeyDeriver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Readable key: `rajaongkir.cities.province_12`.
    ///
    /// `%`, `.` and `_` inside names and values are percent-encoded, so a
    /// value can never forge a segment separator.
    pub fn derive<K, V>(&self, namespace: &str, params: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: Into<String>,
        V: ToString,
    {
        let params = canonical(params);
        let mut key = format!("{}.{}", self.prefix, namespace);
        for (name, value) in &params {
            key.push('.');
            push_escaped(&mut key, name);
            key.push('_');
            push_escaped(&mut key, value);
        }
        key
    }

    /// Key with a SHA-256 digest of the parameters, for free-text values.
    pub fn derive_hashed<K, V>(&self, namespace: &str, params: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: Into<String>,
        V: ToString,
    {
        let params = canonical(params);
        let mut hasher = Sha256::new();
        for (name, value) in &params {
            // Length-prefixed so that ("ab","c") and ("a","bc") never collide.
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
        format!("{}.{}.{:x}", self.prefix, namespace, hasher.finalize())
    }
}

fn push_escaped(key: &mut String, segment: &str) {
    for ch in segment.chars() {
        match ch {
            '%' => key.push_str("%25"),
            '.' => key.push_str("%2E"),
            '_' => key.push_str("%5F"),
            _ => key.push(ch),
        }
    }
}

fn canonical<K, V>(params: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: ToString,
{
    params
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}
