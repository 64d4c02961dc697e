use std::borrow::Cow;

use lazy_static::lazy_static;
use serde_json::Value;

use super::plan::{MigrationReport, StateMigrationPlan};
use super::steps::standard_steps;
use crate::core::LATEST_STATE_VERSION;
use crate::state::defaults::build_default_state;

// Built once, read-only afterwards.
lazy_static! {
    static ref STANDARD_PLAN: StateMigrationPlan = StateMigrationPlan {
        current_version: LATEST_STATE_VERSION,
        steps: standard_steps(),
        default_state: build_default_state,
    };
}

/// The plan that upgrades any historical state to the canonical version.
pub fn standard_plan() -> &'static StateMigrationPlan {
    &STANDARD_PLAN
}

/// Migrates a persisted state blob to the canonical schema.
///
/// Absent storage should be passed as `Value::Null`. A value already at the
/// canonical version is returned borrowed; everything else is a new value,
/// and the caller should persist it.
///
/// ```
/// use serde_json::json;
/// use station_state::migrate_state;
///
/// let raw = json!({"tasks": []});
/// let migrated = migrate_state(&raw);
/// assert_eq!(migrated["stateVersion"], json!(6));
/// assert_eq!(migrated["settings"]["connection"]["port"], json!(5001));
/// ```
pub fn migrate_state(raw: &Value) -> Cow<'_, Value> {
    standard_plan().migrate(raw)
}

/// Like [`migrate_state`], also reporting what the migration did.
pub fn migrate_state_with_report(raw: &Value) -> (Cow<'_, Value>, MigrationReport) {
    standard_plan().migrate_with_report(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::detect::{DetectedVersion, LegacyShape};
    use crate::migration::plan::{FallbackReason, MigrationOutcome};
    use serde_json::json;

    #[test]
    fn test_standard_plan_is_complete() {
        let plan = standard_plan();
        assert!(plan.validate_complete().is_ok());
        assert_eq!(plan.current_version(), LATEST_STATE_VERSION);
        for version in 0..LATEST_STATE_VERSION {
            assert!(plan.step_for(version).is_some());
        }
        assert!(plan.step_for(LATEST_STATE_VERSION).is_none());
    }

    #[test]
    fn test_report_for_future_version() {
        let raw = json!({"stateVersion": 999});
        let (_, report) = migrate_state_with_report(&raw);
        assert_eq!(
            report.outcome,
            MigrationOutcome::Defaulted(FallbackReason::UnsupportedVersion(
                DetectedVersion::Tagged(999)
            ))
        );
    }

    #[test]
    fn test_report_for_legacy_state() {
        let raw = json!({"taskSortType": "name-asc"});
        let (_, report) = migrate_state_with_report(&raw);
        assert_eq!(
            report.detected,
            DetectedVersion::Unversioned(LegacyShape::PreVersioning1)
        );
        assert_eq!(
            report.outcome,
            MigrationOutcome::Migrated {
                from_version: 0,
                steps_applied: 6
            }
        );
    }

    #[test]
    fn test_report_for_current_state() {
        let current = build_default_state();
        let (migrated, report) = migrate_state_with_report(&current);
        assert!(matches!(migrated, Cow::Borrowed(_)));
        assert!(!report.changed());
    }
}
