use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{Level, event};

use super::StateStorage;
use super::config::StoreConfig;
use crate::core::{Result, StateError};

/// Stores the state as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStateStorage {
    config: StoreConfig,
}

impl JsonFileStateStorage {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(StoreConfig::new(path.as_ref()))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl StateStorage for JsonFileStateStorage {
    /// Missing and blank files read as absent state. A file that is not JSON
    /// at all is treated the same way, since nothing in it can be migrated.
    fn load(&self) -> Result<Option<Value>> {
        let path = &self.config.path;
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|err| {
            StateError::IoError(format!("Failed to read '{}': {}", path.display(), err))
        })?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                event!(
                    Level::WARN,
                    path = %path.display(),
                    error = %err,
                    "persisted state is not valid JSON, treating as absent"
                );
                Ok(None)
            }
        }
    }

    fn save(&mut self, state: &Value) -> Result<()> {
        let path = &self.config.path;
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(state)?
        } else {
            serde_json::to_vec(state)?
        };

        if self.config.backup && path.exists() {
            let backup = self.config.backup_path();
            fs::copy(path, &backup).map_err(|err| {
                StateError::IoError(format!(
                    "Failed to back up '{}' -> '{}': {}",
                    path.display(),
                    backup.display(),
                    err
                ))
            })?;
        }

        atomic_write(path, &bytes)?;
        event!(Level::DEBUG, path = %path.display(), bytes = bytes.len(), "persisted state written");
        Ok(())
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                StateError::IoError(format!(
                    "Failed to create parent directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|err| {
        StateError::IoError(format!(
            "Failed to write temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;

    fs::rename(&tmp, path).map_err(|err| {
        StateError::IoError(format!(
            "Failed to rename temp file '{}' -> '{}': {}",
            tmp.display(),
            path.display(),
            err
        ))
    })?;
    Ok(())
}

/// `<file name>.tmp` next to `path`, never `path` itself.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".tmp");
    path.with_file_name(name)
}
