//! Default-state factory
//!
//! The canonical state every fallback path lands on: missing input,
//! unrecognizable input and input tagged with a version newer than the
//! standard plan knows.

use serde_json::{Value, json};

use super::settings::{BadgeDisplayType, TaskSortType};
use super::State;
use crate::core::LATEST_STATE_VERSION;

/// Conventional HTTPS port of a Synology DSM host.
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_COMPLETION_POLLING_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS: bool = false;
pub const DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS: bool = true;
pub const DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS: bool = true;

/// Builds a fresh canonical state populated with baseline defaults.
///
/// Every call allocates a new value, so callers may mutate the result.
pub fn build_default_state() -> Value {
    json!({
        "settings": {
            "connection": {
                "hostname": "",
                "port": DEFAULT_PORT,
                "username": "",
                "password": "",
            },
            "visibleTasks": {
                "downloading": true,
                "uploading": true,
                "completed": true,
                "errored": true,
                "other": true,
            },
            "notifications": {
                "enableCompletionNotifications": DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS,
                "enableFeedbackNotifications": DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS,
                "completionPollingInterval": DEFAULT_COMPLETION_POLLING_INTERVAL_SECS,
            },
            "shouldHandleDownloadLinks": DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS,
            "taskSortType": TaskSortType::default().as_str(),
            "badgeDisplayType": BadgeDisplayType::default().as_str(),
        },
        "tasks": [],
        "taskFetchFailureReason": null,
        "tasksLastInitiatedFetchTimestamp": null,
        "tasksLastCompletedFetchTimestamp": null,
        "lastSevereError": null,
        "stateVersion": LATEST_STATE_VERSION,
    })
}

impl Default for State {
    fn default() -> Self {
        Self {
            settings: Default::default(),
            tasks: Vec::new(),
            task_fetch_failure_reason: None,
            tasks_last_initiated_fetch_timestamp: None,
            tasks_last_completed_fetch_timestamp: None,
            last_severe_error: None,
            state_version: LATEST_STATE_VERSION,
        }
    }
}
