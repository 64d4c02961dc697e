//! Storage adapter around the migration engine.
//!
//! Reads whatever was persisted, migrates it once and writes the canonical
//! value back when migration produced a new one.

use std::borrow::Cow;

use serde_json::Value;
use tracing::{Level, event};

use crate::core::Result;
use crate::migration::{MigrationReport, migrate_state_with_report};

pub mod config;
pub mod file;
pub mod memory;

pub use config::StoreConfig;
pub use file::JsonFileStateStorage;
pub use memory::MemoryStateStorage;

/// Key-value style persistence for the single state document.
pub trait StateStorage {
    /// Returns the persisted state, or `None` when nothing was stored.
    fn load(&self) -> Result<Option<Value>>;

    fn save(&mut self, state: &Value) -> Result<()>;
}

/// The in-memory source of truth after start-up.
#[derive(Debug, Clone)]
pub struct LoadedState {
    pub state: Value,
    pub report: MigrationReport,
    /// Whether the migrated value was written back.
    pub persisted: bool,
}

/// Loads, migrates and (when needed) re-persists the state.
pub fn load_migrated_state<S: StateStorage + ?Sized>(storage: &mut S) -> Result<LoadedState> {
    let raw = storage.load()?.unwrap_or(Value::Null);

    let (migrated, report) = {
        let (migrated, report) = migrate_state_with_report(&raw);
        let migrated = match migrated {
            Cow::Owned(state) => Some(state),
            Cow::Borrowed(_) => None,
        };
        (migrated, report)
    };

    match migrated {
        Some(state) => {
            storage.save(&state)?;
            event!(
                Level::INFO,
                detected = %report.detected,
                target_version = report.target_version,
                "migrated persisted state"
            );
            Ok(LoadedState {
                state,
                report,
                persisted: true,
            })
        }
        None => Ok(LoadedState {
            state: raw,
            report,
            persisted: false,
        }),
    }
}
