//! Cache macros for simplified batch caching.

/// Macro for defining batch-cached async functions.
///
/// The first argument after the resolver is the identifier list. When the
/// generated function runs, the body only executes on a cache miss, with that
/// same argument rebound to the missing identifiers. The body returns
/// `anyhow::Result<HashMap<K, V>>`; the generated function returns
/// `Result<HashMap<K, V>, ResolveError>`.
///
/// # Usage
///
/// ```ignore
/// batch_cached! {
///     name = "users",
///     codec = JsonCodec::<User>::new(),
///     pub async fn find_users(resolver: &BatchResolver, ids: Vec<u64>, repo: &UserRepo) -> HashMap<u64, User> {
///         repo.find_many(&ids).await
///     }
/// }
/// ```
///
/// # Parameters
///
/// - `name`: the cache name, used as the namespace segment of every key
/// - `codec`: an expression producing the [`ValueCodec`](crate::cache::ValueCodec) to use
/// - `async fn`: the loader function definition
#[macro_export]
macro_rules! batch_cached {
    (
        name = $cache_name:literal,
        codec = $codec:expr,
        $(#[$meta:meta])*
        $vis:vis async fn $fn_name:ident(
            $resolver:ident : &BatchResolver,
            $ids:ident : Vec<$id_ty:ty>
            $(, $arg:ident : $arg_ty:ty)* $(,)?
        ) -> HashMap<$key_ty:ty, $val_ty:ty> $body:block
    ) => {
        $(#[$meta])*
        $vis async fn $fn_name(
            $resolver: &$crate::cache::BatchResolver,
            $ids: ::std::vec::Vec<$id_ty>
            $(, $arg: $arg_ty)*
        ) -> ::std::result::Result<
            ::std::collections::HashMap<$key_ty, $val_ty>,
            $crate::cache::ResolveError,
        > {
            let codec = $codec;
            $resolver
                .resolve($cache_name, &$ids, &codec, move |$ids: ::std::vec::Vec<$id_ty>| async move {
                    let loaded: $crate::anyhow::Result<::std::collections::HashMap<$key_ty, $val_ty>> =
                        $body;
                    loaded
                })
                .await
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use crate::cache::{BatchResolver, JsonCodec, KeyCodec, MemoryCache, ResolveError};
    use crate::config::settings::MemoryCacheConfig;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Room {
        id: u32,
        title: String,
    }

    struct RoomSource {
        calls: AtomicUsize,
        requested: std::sync::Mutex<Vec<Vec<u32>>>,
    }

    impl RoomSource {
        async fn find_many(&self, ids: &[u32]) -> anyhow::Result<HashMap<u32, Room>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested
                .lock()
                .map_err(|e| anyhow::anyhow!(e.to_string()))?
                .push(ids.to_vec());
            Ok(ids
                .iter()
                .filter(|id| **id != 404)
                .map(|id| {
                    (
                        *id,
                        Room {
                            id: *id,
                            title: format!("room {id}"),
                        },
                    )
                })
                .collect())
        }
    }

    crate::batch_cached! {
        name = "rooms",
        codec = JsonCodec::<Room>::new(),
        async fn find_rooms(resolver: &BatchResolver, ids: Vec<u32>, source: &RoomSource) -> HashMap<u32, Room> {
            let rooms = source.find_many(&ids).await?;
            Ok(rooms)
        }
    }

    fn resolver() -> BatchResolver {
        let backend = Arc::new(MemoryCache::new(&MemoryCacheConfig { max_size: 100 }).unwrap());
        BatchResolver::new(backend, KeyCodec::new("test"), Duration::from_secs(60)).unwrap()
    }

    fn source() -> RoomSource {
        RoomSource {
            calls: AtomicUsize::new(0),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_body_receives_only_misses() {
        let resolver = resolver();
        let source = source();

        let first = find_rooms(&resolver, vec![1, 2], &source).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = find_rooms(&resolver, vec![1, 2, 3, 404], &source)
            .await
            .unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second[&3].title, "room 3");
        assert!(!second.contains_key(&404));

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *source.requested.lock().unwrap(),
            vec![vec![1, 2], vec![3, 404]]
        );
    }

    #[tokio::test]
    async fn test_empty_ids_rejected() {
        let resolver = resolver();
        let source = source();

        let result = find_rooms(&resolver, Vec::new(), &source).await;
        assert!(matches!(result, Err(ResolveError::EmptyInput)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
