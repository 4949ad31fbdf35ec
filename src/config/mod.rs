//! Settings for batch-cache: the `[cache]` and `[logger]` sections, loaded in
//! layers by [`ConfigLoader`].

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ConfigSource};
pub use settings::{CacheConfig, Settings};
