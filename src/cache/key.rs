//! Cache key construction.
//!
//! Keys have the shape `prefix:cache_name::id` and are encoded as UTF-8.
//! Identifiers are not escaped, so callers must not use identifiers whose
//! string form contains `::`.

use std::fmt::Display;

/// Builds namespaced cache keys under a process-wide prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    /// An empty `prefix` drops the `prefix:` segment entirely.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the key for one identifier.
    pub fn build_key<K: Display + ?Sized>(&self, cache_name: &str, id: &K) -> Vec<u8> {
        let key = if self.prefix.is_empty() {
            format!("{}::{}", cache_name, id)
        } else {
            format!("{}:{}::{}", self.prefix, cache_name, id)
        };
        key.into_bytes()
    }

    /// Build keys for a batch, index-aligned with `ids`.
    pub fn build_keys<K: Display>(&self, cache_name: &str, ids: &[K]) -> Vec<Vec<u8>> {
        ids.iter().map(|id| self.build_key(cache_name, id)).collect()
    }
}
