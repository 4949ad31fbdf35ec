use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("At least one log output (console or file) must be enabled")]
    NoOutput,

    #[error("Log file path must not be empty when file output is enabled")]
    MissingFilePath,

    #[error("Failed to open log file {}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another global subscriber was installed first.
    #[error("Failed to install the global subscriber")]
    Install(#[from] TryInitError),
}
