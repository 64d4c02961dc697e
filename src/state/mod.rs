//! Typed view of the canonical (latest) state schema.
//!
//! The migration engine works on raw JSON; these types are what application
//! code reads once a value has converged on the canonical shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Result;
use crate::json::CanonicalStateValidator;

pub mod defaults;
pub mod fetch;
pub mod settings;

pub use defaults::build_default_state;
pub use fetch::TaskFetchFailureReason;
pub use settings::{
    BadgeDisplayType, ConnectionSettings, NotificationSettings, Settings, TaskSortType,
    VisibleTaskSettings,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub settings: Settings,
    /// Cached task records, kept opaque.
    pub tasks: Vec<Value>,
    pub task_fetch_failure_reason: Option<TaskFetchFailureReason>,
    pub tasks_last_initiated_fetch_timestamp: Option<i64>,
    pub tasks_last_completed_fetch_timestamp: Option<i64>,
    pub last_severe_error: Option<String>,
    pub state_version: u32,
}

impl State {
    /// Parses a canonical value, rejecting anything that is not fully shaped.
    pub fn from_value(value: &Value) -> Result<Self> {
        CanonicalStateValidator::new().validate(value)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Remembers an unhandled error so the popup can surface it.
    pub fn record_severe_error(&mut self, message: impl Into<String>) {
        self.last_severe_error = Some(message.into());
    }

    pub fn clear_severe_error(&mut self) {
        self.last_severe_error = None;
    }

    pub fn last_initiated_fetch_at(&self) -> Option<DateTime<Utc>> {
        self.tasks_last_initiated_fetch_timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    pub fn last_completed_fetch_at(&self) -> Option<DateTime<Utc>> {
        self.tasks_last_completed_fetch_timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_partial_state() {
        let mut value = build_default_state();
        value.as_object_mut().unwrap().remove("lastSevereError");
        assert!(State::from_value(&value).is_err());
    }

    #[test]
    fn test_record_severe_error_round_trips_through_json() {
        let mut state = State::default();
        state.record_severe_error("TypeError: undefined is not a function");

        let value = state.to_value().unwrap();
        assert_eq!(
            value["lastSevereError"],
            json!("TypeError: undefined is not a function")
        );

        state.clear_severe_error();
        assert_eq!(state.to_value().unwrap()["lastSevereError"], Value::Null);
    }

    #[test]
    fn test_fetch_timestamps_as_datetimes() {
        let mut state = State::default();
        assert!(state.last_completed_fetch_at().is_none());

        state.tasks_last_completed_fetch_timestamp = Some(1_700_000_000_000);
        let completed = state.last_completed_fetch_at().unwrap();
        assert_eq!(completed.timestamp(), 1_700_000_000);

        state.tasks_last_initiated_fetch_timestamp = Some(0);
        assert_eq!(state.last_initiated_fetch_at().unwrap().timestamp(), 0);
    }
}
