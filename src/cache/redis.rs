//! Redis backend: one MGET per read, one atomic PSETEX pipeline per write.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError};

use crate::cache::{BatchCache, CacheError, check_ttl};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

/// Redis-backed batch cache with bb8 connection pool.
///
/// Reads are a single `MGET`. Writes are a `MULTI`/`EXEC` pipeline of
/// `PSETEX`, so every entry lands together with its expiry. When running
/// against a cluster all keys of one batch must hash to the same slot, which
/// the default `{...}` key prefix guarantees.
pub struct RedisCache {
    pool: RedisPool,
}

impl RedisCache {
    pub async fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, pool_size = config.pool_size, "redis cache pool ready");

        Ok(Self { pool })
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

#[async_trait]
impl BatchCache for RedisCache {
    async fn read_many(&self, keys: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>, CacheError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;

        redis::cmd("MGET")
            .arg(keys)
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))
    }

    async fn write_many(
        &self,
        entries: Vec<(Vec<u8>, Vec<u8>)>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl_millis = u64::try_from(check_ttl(ttl)?.as_millis())
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(CacheError::InvalidTtl)?;
        if entries.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in &entries {
            pipe.pset_ex(key, value, ttl_millis).ignore();
        }

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;

        let _: () = pipe
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;
        Ok(())
    }
}
