//! Cache manager that builds the configured backend and hands out resolvers.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::redis::RedisCache;
use crate::cache::{BatchCache, BatchResolver, CacheError, KeyCodec, check_ttl};
use crate::config::settings::{CacheBackend, CacheConfig};

/// Owns the configured cache backend.
///
/// Construct one per process from the loaded [`CacheConfig`] and pass it (or
/// the resolvers it creates) to whoever needs batch caching.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn BatchCache>,
    config: CacheConfig,
}

impl CacheManager {
    /// Connects the backend named by `config.backend`, or [`NoOpCache`] when
    /// `config.enabled` is false. The TTL is range-checked first.
    pub async fn new(config: CacheConfig) -> Result<Self, CacheError> {
        check_ttl(Duration::from_secs(config.ttl_seconds))?;

        let backend: Arc<dyn BatchCache> = if !config.enabled {
            Arc::new(NoOpCache)
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryCache::new(&config.memory)?),
                CacheBackend::Redis => Arc::new(RedisCache::new(&config.redis).await?),
            }
        };

        tracing::debug!(
            enabled = config.enabled,
            backend = ?config.backend,
            ttl_seconds = config.ttl_seconds,
            "cache manager initialized"
        );

        Ok(Self { backend, config })
    }

    /// Shared handle to the selected backend.
    pub fn backend(&self) -> &Arc<dyn BatchCache> {
        &self.backend
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// False when reads always miss.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// A resolver bound to this backend, the configured key prefix and TTL.
    pub fn resolver(&self) -> BatchResolver {
        BatchResolver::from_parts(
            Arc::clone(&self.backend),
            KeyCodec::new(self.config.key_prefix.clone()),
            Duration::from_secs(self.config.ttl_seconds),
        )
    }
}
