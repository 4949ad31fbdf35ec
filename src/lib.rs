//! batch-cache
//!
//! Batch cache-aside for keyed lookups: resolve many identifiers with one
//! cache round-trip and at most one loader call, writing the misses back
//! under a shared TTL.

pub mod cache;
pub mod config;
pub mod logger;

#[doc(hidden)]
pub use anyhow;

pub use cache::{
    BatchCache, BatchResolver, CacheError, CacheManager, JsonCodec, KeyCodec, ResolveError,
    StringCodec, ValueCodec,
};
pub use config::{ConfigError, ConfigLoader, Settings};
