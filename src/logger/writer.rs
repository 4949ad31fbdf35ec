use std::fs::{self, File, OpenOptions};

use crate::logger::config::FileOutput;
use crate::logger::error::LoggerError;

/// Open the log file, creating parent directories first.
pub(crate) fn open_log_file(output: &FileOutput) -> Result<File, LoggerError> {
    let open_error = |source| LoggerError::OpenFile {
        path: output.path.clone(),
        source,
    };

    if let Some(parent) = output.path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(open_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(output.append)
        .write(true)
        .truncate(!output.append)
        .open(&output.path)
        .map_err(open_error)
}
