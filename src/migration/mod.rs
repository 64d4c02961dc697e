//! Versioned state migration
//!
//! # Architecture
//!
//! - `detect.rs` - Version tag and legacy-shape detection
//! - `plan.rs` - Migration plan, steps and the driver loop
//! - `steps.rs` - Transforms of the standard lineage
//! - `registry.rs` - The static standard plan and `migrate_state`

pub mod detect;
pub mod plan;
pub mod registry;
pub mod steps;

pub use detect::{DetectedVersion, LegacyShape, classify_legacy, detect_version};
pub use plan::{
    DefaultStateFn, FallbackReason, MigrationOutcome, MigrationReport, StateMigrationFn,
    StateMigrationPlan, StateMigrationStep,
};
pub use registry::{migrate_state, migrate_state_with_report, standard_plan};
