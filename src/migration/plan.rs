use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{Level, event, info_span};

use super::detect::{DetectedVersion, detect_version};
use crate::core::{Result, STATE_VERSION_KEY, StateError};
use crate::json::accessors::{as_integer, field};

/// A pure function turning a value of one schema version into the next.
pub type StateMigrationFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Produces the fully populated state a plan falls back to.
pub type DefaultStateFn = fn() -> Value;

/// Represents a single step in a migration plan.
#[derive(Clone)]
pub struct StateMigrationStep {
    pub from_version: u32,
    pub to_version: u32,
    pub description: String,
    pub(crate) migrator: Option<StateMigrationFn>,
}

/// An ordered table of single-version steps leading to `current_version`.
#[derive(Debug, Clone)]
pub struct StateMigrationPlan {
    pub(crate) current_version: u32,
    pub(crate) steps: Vec<StateMigrationStep>,
    pub(crate) default_state: DefaultStateFn,
}

/// Why a plan discarded its input in favour of the default state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Negative, non-integral, or newer than the plan's target.
    UnsupportedVersion(DetectedVersion),
    /// The table has no step starting at this version.
    MissingStep(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Already at the target version; the input itself was returned.
    Unchanged,
    /// Stepped from `from_version` up to the target.
    Migrated { from_version: u32, steps_applied: usize },
    /// The input was discarded and the default state returned.
    Defaulted(FallbackReason),
}

/// What a single migration run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub detected: DetectedVersion,
    pub target_version: u32,
    pub outcome: MigrationOutcome,
}

impl MigrationReport {
    /// Whether the returned value is a new value that should be persisted.
    pub fn changed(&self) -> bool {
        self.outcome != MigrationOutcome::Unchanged
    }
}

// Keep plan implementation split by concern, like the rest of the versioning code.
include!("plan/step_builder_and_debug.rs");
include!("plan/plan_basics_and_validation.rs");
include!("plan/plan_execution.rs");
