//! Settings loaded from TOML and `BATCH_CACHE_*` environment variables.
//!
//! Every section and field is optional; omitted values take the defaults
//! below.

use serde::{Deserialize, Serialize};

use crate::logger::LoggerConfig;

/// Default key prefix. The braces make it a redis cluster hash tag, so every
/// key of a batch maps to one slot.
pub const DEFAULT_KEY_PREFIX: &str = "{batch-cache}";

/// One day.
pub const DEFAULT_TTL_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process store; needs no external service
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Entry count at which the least recently used entry is evicted
    pub max_size: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { max_size: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisCacheConfig {
    /// `redis://`, `rediss://` or `unix://` URL
    pub url: String,
    pub pool_size: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 4,
            connection_timeout: 5,
        }
    }
}

/// The `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false every lookup goes straight to the loader.
    pub enabled: bool,
    pub backend: CacheBackend,
    /// Empty means keys carry no prefix segment.
    pub key_prefix: String,
    pub ttl_seconds: u64,
    pub memory: MemoryCacheConfig,
    pub redis: RedisCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: CacheBackend::default(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            memory: MemoryCacheConfig::default(),
            redis: RedisCacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheConfig,
    pub logger: LoggerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{ConsoleOutput, FileOutput, LogFormat, LogLevel};
    use proptest::prelude::*;

    fn arb_logger() -> impl Strategy<Value = LoggerConfig> {
        (
            prop_oneof![
                Just(LogLevel::Trace),
                Just(LogLevel::Debug),
                Just(LogLevel::Info),
                Just(LogLevel::Warn),
                Just(LogLevel::Error),
            ],
            any::<(bool, bool, bool, bool)>(),
            prop_oneof![
                Just(LogFormat::Full),
                Just(LogFormat::Compact),
                Just(LogFormat::Json),
            ],
            "[a-z]{1,8}/[a-z]{1,8}\\.log",
        )
            .prop_map(
                |(level, (console, colored, file, append), format, path)| LoggerConfig {
                    level,
                    console: ConsoleOutput {
                        enabled: console,
                        colored,
                    },
                    file: FileOutput {
                        enabled: file,
                        path: path.into(),
                        append,
                        format,
                    },
                },
            )
    }

    fn arb_cache() -> impl Strategy<Value = CacheConfig> {
        (
            any::<bool>(),
            prop_oneof![Just(CacheBackend::Memory), Just(CacheBackend::Redis)],
            "(\\{[a-z][a-z0-9-]{0,12}\\})?",
            1u64..=604_800u64,
            1usize..=1_000_000usize,
            1u32..=64u32,
            1u64..=60u64,
        )
            .prop_map(
                |(enabled, backend, key_prefix, ttl_seconds, max_size, pool_size, timeout)| {
                    CacheConfig {
                        enabled,
                        backend,
                        key_prefix,
                        ttl_seconds,
                        memory: MemoryCacheConfig { max_size },
                        redis: RedisCacheConfig {
                            url: "redis://cache.internal:6379/2".to_string(),
                            pool_size,
                            connection_timeout: timeout,
                        },
                    }
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_settings_survive_toml(cache in arb_cache(), logger in arb_logger()) {
            let settings = Settings { cache, logger };
            let text = toml::to_string(&settings).unwrap();
            prop_assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
        }
    }

    #[test]
    fn test_empty_document_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.cache.backend, CacheBackend::Memory);
        assert_eq!(settings.cache.key_prefix, "{batch-cache}");
        assert_eq!(settings.cache.ttl_seconds, 86_400);
        assert_eq!(settings.cache.memory.max_size, 10_000);
        assert_eq!(settings.cache.redis.pool_size, 4);
    }

    #[test]
    fn test_partial_sections_keep_sibling_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[cache]
backend = "redis"
ttl_seconds = 600

[cache.redis]
url = "redis://10.0.0.5:6380"

[logger.file]
enabled = true
"#,
        )
        .unwrap();

        assert_eq!(settings.cache.backend, CacheBackend::Redis);
        assert_eq!(settings.cache.ttl_seconds, 600);
        assert_eq!(settings.cache.redis.url, "redis://10.0.0.5:6380");
        assert_eq!(settings.cache.redis.connection_timeout, 5);
        assert_eq!(settings.cache.key_prefix, DEFAULT_KEY_PREFIX);
        assert!(settings.logger.file.enabled);
        assert_eq!(settings.logger.file.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(toml::from_str::<Settings>("[cache]\nbackend = \"disk\"\n").is_err());
    }

    #[test]
    fn test_shipped_default_file_matches_defaults() {
        let shipped: Settings =
            toml::from_str(include_str!("../../config/default.toml")).unwrap();
        assert_eq!(shipped, Settings::default());
    }
}
