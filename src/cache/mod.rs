//! Batch cache-aside over a distributed key-value store.
//!
//! [`BatchResolver::resolve`] takes a list of identifiers and a loader, reads
//! every identifier from the backend in one round-trip, calls the loader once
//! for whatever was missing, writes the loaded values back under the
//! configured TTL and returns the merged mapping.
//!
//! Backends implement [`BatchCache`]:
//! - Redis (distributed, `MGET` + pipelined `PSETEX`)
//! - Memory (in-process, bounded)
//! - NoOp (caching disabled)
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "memory"  # or "redis"
//! key_prefix = "{batch-cache}"
//! ttl_seconds = 86400
//!
//! [cache.memory]
//! max_size = 10000
//!
//! [cache.redis]
//! url = "redis://127.0.0.1:6379"
//! pool_size = 4
//! connection_timeout = 5
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let manager = CacheManager::new(settings.cache).await?;
//! let users: HashMap<u64, User> = manager
//!     .resolver()
//!     .resolve("users", &ids, &JsonCodec::<User>::new(), |misses| async move {
//!         repo.find_many(&misses).await
//!     })
//!     .await?;
//! ```
//!
//! Or declare the cached function with [`batch_cached!`](crate::batch_cached).

mod codec;
mod error;
mod key;
#[macro_use]
mod macros;
mod manager;
mod memory;
mod noop;
mod redis;
mod resolver;
mod traits;


pub use codec::{JsonCodec, StringCodec, ValueCodec};
pub use error::{CacheError, ResolveError};
pub use key::KeyCodec;
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use redis::RedisCache;
pub use resolver::BatchResolver;
pub use traits::{BatchCache, MAX_TTL, check_ttl};

// Re-export config types
pub use crate::config::settings::{CacheBackend, CacheConfig, MemoryCacheConfig, RedisCacheConfig};
