//! Cache error types.

use thiserror::Error;

/// Errors raised by cache backends and value codecs.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    Operation(String),

    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache TTL must be greater than zero and at most 100 years")]
    InvalidTtl,
}

/// Errors returned by [`BatchResolver::resolve`](crate::cache::BatchResolver::resolve).
///
/// Only failures that prevent working out what is cached, or that come from
/// the loader itself, surface here. Undecodable entries and failed
/// write-backs are logged and recovered inside the resolver.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The identifier list was empty. Raised before the backend is contacted.
    #[error("Identifier list must not be empty")]
    EmptyInput,

    /// The batch read from the cache backend failed.
    #[error("Cache read failed")]
    BackendRead(#[source] CacheError),

    /// The fallback loader failed while resolving misses.
    #[error("Loader failed")]
    Loader(#[source] anyhow::Error),
}
