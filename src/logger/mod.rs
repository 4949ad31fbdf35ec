//! Subscriber setup for processes that embed batch-cache.
//!
//! The cache layer only emits `tracing` events. Applications that already
//! install a subscriber do not need this module; the rest call
//! [`init_logger`] with the `[logger]` section of their settings.

pub mod config;
pub mod error;
pub(crate) mod writer;


pub use config::{ConsoleOutput, FileOutput, LogFormat, LogLevel, LoggerConfig};
pub use error::LoggerError;

use std::io::IsTerminal;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// `config.level` is the default; `RUST_LOG` directives refine it per target.
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(build_layers(config)?)
        .with(filter)
        .try_init()?;
    Ok(())
}

/// The file layer comes first so the console's ANSI setting never reaches the file.
pub(crate) fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers = Vec::with_capacity(2);

    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }

    if config.console.enabled {
        let ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(fmt::layer().with_ansi(ansi).boxed());
    }

    Ok(layers)
}

fn file_layer(output: &FileOutput) -> Result<BoxedLayer, LoggerError> {
    let layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(writer::open_log_file(output)?));

    Ok(match output.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}
