use serde::{Deserialize, Serialize};
use std::fmt;

use super::defaults::{
    DEFAULT_COMPLETION_POLLING_INTERVAL_SECS, DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS,
    DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS, DEFAULT_PORT, DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS,
};

/// Credentials and address of the Download Station host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Which task categories the popup lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleTaskSettings {
    pub downloading: bool,
    pub uploading: bool,
    pub completed: bool,
    pub errored: bool,
    pub other: bool,
}

impl Default for VisibleTaskSettings {
    fn default() -> Self {
        Self {
            downloading: true,
            uploading: true,
            completed: true,
            errored: true,
            other: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enable_completion_notifications: bool,
    pub enable_feedback_notifications: bool,
    /// Seconds between completion checks.
    pub completion_polling_interval: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enable_completion_notifications: DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS,
            enable_feedback_notifications: DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS,
            completion_polling_interval: DEFAULT_COMPLETION_POLLING_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskSortType {
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    #[serde(rename = "name-desc")]
    NameDesc,
    #[serde(rename = "timestamp-completed-asc")]
    TimestampCompletedAsc,
    #[serde(rename = "timestamp-completed-desc")]
    TimestampCompletedDesc,
    #[serde(rename = "timestamp-added-asc")]
    TimestampAddedAsc,
    #[serde(rename = "timestamp-added-desc")]
    TimestampAddedDesc,
    #[serde(rename = "completed-percent-asc")]
    CompletedPercentAsc,
    #[serde(rename = "completed-percent-desc")]
    CompletedPercentDesc,
}

impl TaskSortType {
    /// The identifiers as they appear in persisted state.
    pub const NAMES: [&'static str; 8] = [
        "name-asc",
        "name-desc",
        "timestamp-completed-asc",
        "timestamp-completed-desc",
        "timestamp-added-asc",
        "timestamp-added-desc",
        "completed-percent-asc",
        "completed-percent-desc",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskSortType::NameAsc => "name-asc",
            TaskSortType::NameDesc => "name-desc",
            TaskSortType::TimestampCompletedAsc => "timestamp-completed-asc",
            TaskSortType::TimestampCompletedDesc => "timestamp-completed-desc",
            TaskSortType::TimestampAddedAsc => "timestamp-added-asc",
            TaskSortType::TimestampAddedDesc => "timestamp-added-desc",
            TaskSortType::CompletedPercentAsc => "completed-percent-asc",
            TaskSortType::CompletedPercentDesc => "completed-percent-desc",
        }
    }
}

impl fmt::Display for TaskSortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the toolbar badge counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeDisplayType {
    #[default]
    Total,
    Completed,
}

impl BadgeDisplayType {
    pub const NAMES: [&'static str; 2] = ["total", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeDisplayType::Total => "total",
            BadgeDisplayType::Completed => "completed",
        }
    }
}

impl fmt::Display for BadgeDisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing settings of the canonical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub visible_tasks: VisibleTaskSettings,
    pub notifications: NotificationSettings,
    pub should_handle_download_links: bool,
    pub task_sort_type: TaskSortType,
    pub badge_display_type: BadgeDisplayType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            visible_tasks: VisibleTaskSettings::default(),
            notifications: NotificationSettings::default(),
            should_handle_download_links: DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS,
            task_sort_type: TaskSortType::default(),
            badge_display_type: BadgeDisplayType::default(),
        }
    }
}
