// ============================================================================
// station_state Library
// ============================================================================

pub mod core;
pub mod json;
pub mod migration;
pub mod state;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{LATEST_STATE_VERSION, Result, STATE_VERSION_KEY, StateError};
pub use json::{CanonicalStateValidator, is_canonical};
pub use migration::{
    DetectedVersion, FallbackReason, LegacyShape, MigrationOutcome, MigrationReport,
    StateMigrationPlan, StateMigrationStep, detect_version, migrate_state,
    migrate_state_with_report, standard_plan,
};
pub use state::{
    BadgeDisplayType, ConnectionSettings, NotificationSettings, Settings, State,
    TaskFetchFailureReason, TaskSortType, VisibleTaskSettings, build_default_state,
};

// Re-export storage API
pub use storage::{
    JsonFileStateStorage, LoadedState, MemoryStateStorage, StateStorage, StoreConfig,
    load_migrated_state,
};
