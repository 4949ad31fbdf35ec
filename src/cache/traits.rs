//! BatchCache trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::CacheError;

/// Longest TTL a backend accepts: one hundred years.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Returns `ttl` if it is non-zero and at most [`MAX_TTL`].
pub fn check_ttl(ttl: Duration) -> Result<Duration, CacheError> {
    if ttl.is_zero() || ttl > MAX_TTL {
        return Err(CacheError::InvalidTtl);
    }
    Ok(ttl)
}

/// Batch operations the resolver needs from a key-value store.
///
/// Keys and values are opaque bytes at this boundary. Implementations should
/// issue one round-trip per call rather than one per key.
#[async_trait]
pub trait BatchCache: Send + Sync {
    /// Read every key in one call.
    ///
    /// The result is index-aligned with `keys`; a missing entry is `None`.
    async fn read_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, CacheError>;

    /// Write every entry in one call, each with the same `ttl`.
    ///
    /// A `ttl` rejected by [`check_ttl`] fails with [`CacheError::InvalidTtl`]
    /// and writes nothing.
    async fn write_many(
        &self,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ttl_range() {
        assert!(matches!(check_ttl(Duration::ZERO), Err(CacheError::InvalidTtl)));
        assert!(matches!(
            check_ttl(MAX_TTL + Duration::from_nanos(1)),
            Err(CacheError::InvalidTtl)
        ));
        assert!(matches!(check_ttl(Duration::MAX), Err(CacheError::InvalidTtl)));
        assert_eq!(check_ttl(MAX_TTL).unwrap(), MAX_TTL);

        // largest accepted TTL still fits redis' signed millisecond expiry
        assert!(MAX_TTL.as_millis() < i64::MAX as u128 / 2);
    }
}
