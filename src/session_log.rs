//! Append-only, human-readable session log written next to a rename run.
//!
//! Every line has the form `[YYYY-MM-DD HH:MM:SS] message`. Callers that do
//! not want a log simply pass no sink.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::warn;

/// Where timestamped log files are created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            prefix: "log_file_".to_string(),
            extension: ".log".to_string(),
        }
    }
}

impl LogConfig {
    /// File name for a log started at `started`, e.g. `log_file_20260105_093012.log`
    pub fn file_name(&self, started: &DateTime<Local>) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            started.format("%Y%m%d_%H%M%S"),
            self.extension
        )
    }

    /// Create the log directory if needed and return a fresh timestamped path
    pub fn create_log_path(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.directory)?;
        Ok(self.directory.join(self.file_name(&Local::now())))
    }
}

/// A timestamped log path when `enabled`, `None` otherwise
pub fn maybe_create_log_path(enabled: bool, config: &LogConfig) -> io::Result<Option<PathBuf>> {
    if !enabled {
        return Ok(None);
    }
    config.create_log_path().map(Some)
}

/// Render one log line, without the trailing newline
pub fn format_log_line(at: &NaiveDateTime, message: &str) -> String {
    format!("[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message)
}

/// Append-only text sink backed by a file
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    ///
    /// Write failures are reported through tracing and otherwise ignored; a
    /// log that cannot be written never interrupts a rename run.
    pub fn append(&self, message: &str) {
        let line = format_log_line(&Local::now().naive_local(), message);
        if let Err(e) = self.write_line(&line) {
            warn!(path = ?self.path, error = %e, "Failed to write log line");
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

/// Append to `sink` when one is configured
pub(crate) fn log_line(sink: Option<&LogSink>, message: &str) {
    if let Some(sink) = sink {
        sink.append(message);
    }
}
