use std::env;
use std::path::PathBuf;

use crate::session_log::LogConfig;

/// Environment variable names for relabeler configuration
pub const ENV_LOG_DIR: &str = "RELABELER_LOG_DIR";
pub const ENV_MAPPINGS_FILE: &str = "RELABELER_MAPPINGS_FILE";

/// Default location for undo mappings written by `rename`
pub const DEFAULT_MAPPINGS_FILE: &str = "undo_mappings.json";

/// Settings that do not come from command-line flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where `--log` session logs are created
    pub log: LogConfig,
    /// Where `rename` saves undo mappings when no path is given
    pub mappings_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            mappings_file: PathBuf::from(DEFAULT_MAPPINGS_FILE),
        }
    }
}

/// Load configuration from environment variables
///
/// Recognized environment variables:
/// - `RELABELER_LOG_DIR`: directory for session logs (default `logs`)
/// - `RELABELER_MAPPINGS_FILE`: default undo mappings path
///   (default `undo_mappings.json`)
///
/// These can be set in a `.env` file in the working directory.
pub fn config_from_env() -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(dir) = non_empty_var(ENV_LOG_DIR) {
        config.log.directory = PathBuf::from(dir);
    }

    if let Some(file) = non_empty_var(ENV_MAPPINGS_FILE) {
        config.mappings_file = PathBuf::from(file);
    }

    config
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
