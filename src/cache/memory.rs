//! Memory cache implementation using cached::SizedCache with per-entry expiry.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cached::{Cached, SizedCache};

use crate::cache::{BatchCache, CacheError, check_ttl};
use crate::config::settings::MemoryCacheConfig;

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process cache bounded by entry count, each entry carrying its own TTL.
pub struct MemoryCache {
    store: Mutex<SizedCache<Vec<u8>, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig) -> Result<Self, CacheError> {
        let store = SizedCache::try_with_size(config.max_size)
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        Ok(Self {
            store: Mutex::new(store),
        })
    }

    /// Number of entries held, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.store.lock().map(|s| s.cache_size()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BatchCache for MemoryCache {
    async fn read_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, CacheError> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        let now = Instant::now();

        let values = keys
            .iter()
            .map(|key| {
                let expired = match store.cache_get(key) {
                    Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                    Some(_) => true,
                    None => false,
                };
                if expired {
                    store.cache_remove(key);
                }
                None
            })
            .collect();

        Ok(values)
    }

    async fn write_many(
        &self,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl = check_ttl(ttl)?;
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(CacheError::InvalidTtl)?;

        let mut store = self
            .store
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))?;

        for (key, value) in entries {
            store.cache_set(key, CacheEntry { value, expires_at });
        }
        Ok(())
    }
}
