//! Batch cache-aside resolution.
//!
//! A resolver reads every requested identifier from the backend in one call,
//! hands the misses to a caller-supplied loader, writes whatever the loader
//! returned back in one call, and merges both halves into the result.
//!
//! Concurrent callers missing on the same identifiers each run the loader and
//! each write the (identical) values back. There is no single-flight
//! coordination between them.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{BatchCache, CacheError, KeyCodec, ResolveError, ValueCodec, check_ttl};

/// Resolves batches of identifiers through a [`BatchCache`].
#[derive(Clone)]
pub struct BatchResolver {
    backend: Arc<dyn BatchCache>,
    keys: KeyCodec,
    ttl: Duration,
}

impl BatchResolver {
    /// Create a resolver writing entries with the given `ttl`.
    ///
    /// Returns [`CacheError::InvalidTtl`] for a zero `ttl` or one longer than
    /// [`MAX_TTL`](crate::cache::MAX_TTL).
    pub fn new(
        backend: Arc<dyn BatchCache>,
        keys: KeyCodec,
        ttl: Duration,
    ) -> Result<Self, CacheError> {
        let ttl = check_ttl(ttl)?;
        Ok(Self::from_parts(backend, keys, ttl))
    }

    pub(crate) fn from_parts(backend: Arc<dyn BatchCache>, keys: KeyCodec, ttl: Duration) -> Self {
        Self { backend, keys, ttl }
    }

    pub fn keys(&self) -> &KeyCodec {
        &self.keys
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve every identifier in `ids` under `cache_name`.
    ///
    /// `loader` is called at most once, with the identifiers that were not
    /// cached (in request order, without duplicates). It may return fewer
    /// entries than it was asked for; identifiers it leaves out are simply
    /// absent from the result. Entries for identifiers it was not asked
    /// about are discarded.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::EmptyInput`] if `ids` is empty
    /// - [`ResolveError::BackendRead`] if the batch read fails
    /// - [`ResolveError::Loader`] if the loader fails
    ///
    /// A failed write-back is logged and does not fail the call.
    pub async fn resolve<K, V, C, F, Fut>(
        &self,
        cache_name: &str,
        ids: &[K],
        codec: &C,
        loader: F,
    ) -> Result<HashMap<K, V>, ResolveError>
    where
        K: Eq + Hash + Clone + Display,
        C: ValueCodec<V> + ?Sized,
        F: FnOnce(Vec<K>) -> Fut,
        Fut: Future<Output = anyhow::Result<HashMap<K, V>>>,
    {
        if ids.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        let mut hits = self.read_hits(cache_name, ids, codec).await?;
        let misses = missing_ids(ids, &hits);

        tracing::debug!(
            cache = cache_name,
            requested = ids.len(),
            hits = hits.len(),
            misses = misses.len(),
            "batch cache lookup"
        );

        if misses.is_empty() {
            return Ok(hits);
        }

        let requested: HashSet<K> = misses.iter().cloned().collect();
        let mut loaded = loader(misses).await.map_err(ResolveError::Loader)?;

        let returned = loaded.len();
        loaded.retain(|id, _| requested.contains(id));
        if loaded.len() < returned {
            tracing::warn!(
                cache = cache_name,
                discarded = returned - loaded.len(),
                "loader returned entries that were not requested"
            );
        }

        if !loaded.is_empty() {
            self.write_back(cache_name, &loaded, codec).await;
        }

        hits.extend(loaded);
        Ok(hits)
    }

    /// Resolve identifiers extracted from a set of call arguments.
    ///
    /// `extract` pulls the identifier list out of `args` before anything else
    /// runs. On a miss, `call` receives the arguments back together with the
    /// missing identifiers, standing in for a re-invocation of the original
    /// call with the miss set substituted.
    pub async fn resolve_with<A, K, V, C, X, F, Fut>(
        &self,
        cache_name: &str,
        args: A,
        extract: X,
        codec: &C,
        call: F,
    ) -> Result<HashMap<K, V>, ResolveError>
    where
        K: Eq + Hash + Clone + Display,
        C: ValueCodec<V> + ?Sized,
        X: FnOnce(&A) -> Vec<K>,
        F: FnOnce(A, Vec<K>) -> Fut,
        Fut: Future<Output = anyhow::Result<HashMap<K, V>>>,
    {
        let ids = extract(&args);
        self.resolve(cache_name, &ids, codec, move |misses| call(args, misses))
            .await
    }

    async fn read_hits<K, V, C>(
        &self,
        cache_name: &str,
        ids: &[K],
        codec: &C,
    ) -> Result<HashMap<K, V>, ResolveError>
    where
        K: Eq + Hash + Clone + Display,
        C: ValueCodec<V> + ?Sized,
    {
        let keys = self.keys.build_keys(cache_name, ids);
        let values = self
            .backend
            .read_many(&keys)
            .await
            .map_err(ResolveError::BackendRead)?;

        if values.len() != keys.len() {
            return Err(ResolveError::BackendRead(CacheError::Operation(format!(
                "expected {} values, backend returned {}",
                keys.len(),
                values.len()
            ))));
        }

        let mut hits = HashMap::with_capacity(ids.len());
        for (id, value) in ids.iter().zip(values) {
            let Some(bytes) = value.filter(|b| !b.is_empty()) else {
                continue;
            };
            match codec.decode(&bytes) {
                Ok(decoded) => {
                    hits.insert(id.clone(), decoded);
                }
                Err(e) => {
                    tracing::trace!(cache = cache_name, id = %id, error = %e, "treating undecodable entry as a miss");
                }
            }
        }
        Ok(hits)
    }

    async fn write_back<K, V, C>(&self, cache_name: &str, loaded: &HashMap<K, V>, codec: &C)
    where
        K: Display,
        C: ValueCodec<V> + ?Sized,
    {
        let mut entries = Vec::with_capacity(loaded.len());
        for (id, value) in loaded {
            match codec.encode(value) {
                Ok(bytes) => entries.push((self.keys.build_key(cache_name, id), bytes)),
                Err(e) => {
                    tracing::warn!(cache = cache_name, id = %id, error = %e, "skipping write-back of unencodable value");
                }
            }
        }

        if entries.is_empty() {
            return;
        }

        let count = entries.len();
        if let Err(e) = self.backend.write_many(entries, self.ttl).await {
            tracing::warn!(cache = cache_name, entries = count, error = %e, "cache write-back failed");
        }
    }
}

/// Identifiers not present in `hits`, in request order, first occurrence only.
fn missing_ids<K, V>(ids: &[K], hits: &HashMap<K, V>) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| !hits.contains_key(*id) && seen.insert(*id))
        .cloned()
        .collect()
}
