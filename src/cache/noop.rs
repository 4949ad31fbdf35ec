//! Backend selected when `cache.enabled = false`.
//!
//! Every read misses and writes are dropped, so every resolution goes
//! straight to the loader.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{BatchCache, CacheError};

/// Stores nothing; [`read_many`](BatchCache::read_many) reports a miss per key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait]
impl BatchCache for NoOpCache {
    async fn read_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, CacheError> {
        Ok(vec![None; keys.len()])
    }

    async fn write_many(
        &self,
        _entries: Vec<(Vec<u8>, Vec<u8>)>,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_misses() {
        let cache = NoOpCache;
        cache
            .write_many(vec![(b"k".to_vec(), b"v".to_vec())], Duration::from_secs(1))
            .await
            .unwrap();
        let values = cache
            .read_many(&[b"k".to_vec(), b"j".to_vec()])
            .await
            .unwrap();
        assert_eq!(values, vec![None, None]);
    }
}
