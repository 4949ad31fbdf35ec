use std::path::PathBuf;

use thiserror::Error;

use crate::logger::LoggerError;

/// Errors raised while loading or checking [`Settings`](crate::config::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required configuration file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("BATCH_CACHE_CONFIG_DIR and BATCH_CACHE_CONFIG_FILE cannot both be set")]
    ConflictingSources,

    #[error(
        "Unknown environment '{0}' in BATCH_CACHE_APP_ENV, expected development, test, staging or production"
    )]
    UnknownEnvironment(String),

    /// The key prefix contains the `::` that separates cache names from identifiers.
    #[error("cache.key_prefix '{0}' must not contain '::'")]
    PrefixDelimiter(String),

    /// A `[cache]` value is out of range; `key` is the dotted setting name.
    #[error("Invalid {key}: {reason}")]
    InvalidCache { key: &'static str, reason: String },

    #[error("Invalid [logger] section")]
    InvalidLogger(#[from] LoggerError),

    /// Reading a file, merging environment overrides or deserializing failed.
    #[error("Failed to read configuration")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub(crate) fn invalid_cache(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidCache {
            key,
            reason: reason.into(),
        }
    }

    /// The dotted setting name this error is about, when there is one.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::PrefixDelimiter(_) => Some("cache.key_prefix"),
            ConfigError::InvalidCache { key, .. } => Some(*key),
            _ => None,
        }
    }
}
