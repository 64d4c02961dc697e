use std::env;
use std::path::{Path, PathBuf};

use crate::core::{Result, StateError};

pub const STATE_PATH_ENV: &str = "STATION_STATE_PATH";
pub const STATE_PRETTY_ENV: &str = "STATION_STATE_PRETTY";
pub const STATE_BACKUP_ENV: &str = "STATION_STATE_BACKUP";

const DEFAULT_STATE_FILE: &str = "station_state.json";

/// File-backed state store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the JSON file holding the persisted state
    pub path: PathBuf,

    /// Write indented JSON
    pub pretty: bool,

    /// Keep the previous file as `<path>.bak` before overwriting it
    pub backup: bool,
}

impl StoreConfig {
    /// Create a configuration for the given state file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
            backup: false,
        }
    }

    /// Set indented output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set backup of the previous file
    pub fn backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Where the previous file is kept when backups are enabled
    pub fn backup_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_STATE_FILE.into());
        file_name.push(".bak");
        self.path.with_file_name(file_name)
    }

    /// Build a configuration from `STATION_STATE_*` environment variables.
    ///
    /// The path defaults to `station_state.json` in the current directory.
    pub fn from_env() -> Result<Self> {
        let path = match env::var(STATE_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => env::current_dir()
                .map_err(|err| {
                    StateError::ConfigError(format!("resolve current directory: {}", err))
                })?
                .join(DEFAULT_STATE_FILE),
        };

        Ok(Self::new(path)
            .pretty(flag_from_env(STATE_PRETTY_ENV)?.unwrap_or(false))
            .backup(flag_from_env(STATE_BACKUP_ENV)?.unwrap_or(false)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn flag_from_env(key: &str) -> Result<Option<bool>> {
    match env::var(key) {
        Ok(raw) => parse_flag(&raw)
            .map(Some)
            .ok_or_else(|| StateError::ConfigError(format!("invalid {}='{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
