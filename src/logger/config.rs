//! The `[logger]` section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::logger::LoggerError;

/// Minimum level of recorded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Line layout of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    #[default]
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOutput {
    pub enabled: bool,
    /// ANSI colors, applied only when stdout is a terminal
    pub colored: bool,
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutput {
    pub enabled: bool,
    /// Missing parent directories are created on startup
    pub path: PathBuf,
    /// Keep existing content instead of truncating
    pub append: bool,
    pub format: LogFormat,
}

impl Default for FileOutput {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/batch-cache.log"),
            append: true,
            format: LogFormat::default(),
        }
    }
}

/// Where cache events go and how much of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub console: ConsoleOutput,
    pub file: FileOutput,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::NoOutput);
        }
        if self.file.enabled && self.file.path.as_os_str().is_empty() {
            return Err(LoggerError::MissingFilePath);
        }
        Ok(())
    }
}
