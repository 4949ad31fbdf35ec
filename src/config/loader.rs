//! Layered loading of [`Settings`].
//!
//! Later sources override earlier ones:
//! 1. `default.toml` in the config directory (required)
//! 2. `{environment}.toml` (optional)
//! 3. `local.toml` (optional)
//! 4. `BATCH_CACHE_<SECTION>__<FIELD>` environment variables, e.g.
//!    `BATCH_CACHE_CACHE__TTL_SECONDS=600` or `BATCH_CACHE_LOGGER__LEVEL=debug`
//!
//! `BATCH_CACHE_CONFIG_FILE` replaces steps 1 to 3 with one required file.

use std::path::PathBuf;

use config::{Config, File, FileFormat, Map};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

pub const CONFIG_DIR_VAR: &str = "BATCH_CACHE_CONFIG_DIR";
pub const CONFIG_FILE_VAR: &str = "BATCH_CACHE_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "BATCH_CACHE";

/// Where the TOML layers are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Layered {
        dir: PathBuf,
        environment: Environment,
    },
    File(PathBuf),
}

impl ConfigSource {
    /// Files in merge order, each paired with whether it must exist.
    fn files(&self) -> Vec<(PathBuf, bool)> {
        match self {
            ConfigSource::File(path) => vec![(path.clone(), true)],
            ConfigSource::Layered { dir, environment } => vec![
                (dir.join("default.toml"), true),
                (dir.join(environment.overlay_file()), false),
                (dir.join("local.toml"), false),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source: ConfigSource,
    env_overrides: Option<Map<String, String>>,
}

impl ConfigLoader {
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            env_overrides: None,
        }
    }

    /// Choose the source from `BATCH_CACHE_CONFIG_DIR`, `BATCH_CACHE_CONFIG_FILE`
    /// and `BATCH_CACHE_APP_ENV`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`from_env`](Self::from_env) with variables read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = match (lookup(CONFIG_DIR_VAR), lookup(CONFIG_FILE_VAR)) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSources),
            (None, Some(file)) => ConfigSource::File(file.into()),
            (dir, None) => ConfigSource::Layered {
                dir: dir.unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string()).into(),
                environment: match lookup(Environment::ENV_VAR) {
                    Some(name) => name.parse()?,
                    None => Environment::default(),
                },
            },
        };
        Ok(Self::new(source))
    }

    /// Take `BATCH_CACHE_*` overrides from `vars` instead of the process environment.
    pub fn with_env_overrides(mut self, vars: Map<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Merge every layer, deserialize and validate.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        for (path, required) in self.source.files() {
            if required && !path.is_file() {
                return Err(ConfigError::MissingFile(path));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(required));
        }

        let overrides = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .ignore_empty(true)
            .try_parsing(true)
            .source(self.env_overrides.clone());

        let settings: Settings = builder.add_source(overrides).build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            source = ?self.source,
            backend = ?settings.cache.backend,
            enabled = settings.cache.enabled,
            "configuration loaded"
        );
        Ok(settings)
    }
}
