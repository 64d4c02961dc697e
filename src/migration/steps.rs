//! The transforms of the standard state lineage.
//!
//! Each transform reads the previous version's shape through the defensive
//! accessors, so absent or mistyped fields pick up a default and unknown
//! fields are dropped. None of them touch their input.

use serde_json::{Value, json};

use super::detect::{LegacyShape, classify_legacy};
use super::plan::StateMigrationStep;
use crate::json::accessors::{
    array_or_empty, as_integer, bool_or, choice_or, field, group, missing, port_or, seconds,
    string_or, string_or_null, timestamp_or_null,
};
use crate::state::defaults::{
    DEFAULT_COMPLETION_POLLING_INTERVAL_SECS, DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS,
    DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS, DEFAULT_PORT, DEFAULT_PROTOCOL,
    DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS,
};
use crate::state::fetch::failure_reason_or_null;
use crate::state::settings::{BadgeDisplayType, TaskSortType};

const PROTOCOLS: [&str; 2] = ["http", "https"];

fn connection_fields(connection: &Value) -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("hostname".into(), string_or(connection, "hostname", "").into());
    fields.insert("port".into(), port_or(connection, "port", DEFAULT_PORT).into());
    fields.insert("username".into(), string_or(connection, "username", "").into());
    fields.insert("password".into(), string_or(connection, "password", "").into());
    fields
}

/// Connection group up to version 5, which still selects a protocol.
fn connection_with_protocol(connection: &Value) -> Value {
    let mut fields = connection_fields(connection);
    fields.insert(
        "protocol".into(),
        choice_or(connection, "protocol", &PROTOCOLS, DEFAULT_PROTOCOL).into(),
    );
    Value::Object(fields)
}

fn visible_tasks(visible: &Value) -> Value {
    json!({
        "downloading": bool_or(visible, "downloading", true),
        "uploading": bool_or(visible, "uploading", true),
        "completed": bool_or(visible, "completed", true),
        "errored": bool_or(visible, "errored", true),
        "other": bool_or(visible, "other", true),
    })
}

/// Notification group from version 2 on.
fn notification_settings(notifications: &Value) -> Value {
    json!({
        "enableCompletionNotifications": bool_or(
            notifications,
            "enableCompletionNotifications",
            DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS,
        ),
        "enableFeedbackNotifications": bool_or(
            notifications,
            "enableFeedbackNotifications",
            DEFAULT_ENABLE_FEEDBACK_NOTIFICATIONS,
        ),
        "completionPollingInterval": seconds(notifications, "completionPollingInterval")
            .unwrap_or(DEFAULT_COMPLETION_POLLING_INTERVAL_SECS),
    })
}

fn task_sort_type(source: &Value) -> String {
    choice_or(
        source,
        "taskSortType",
        &TaskSortType::NAMES,
        TaskSortType::default().as_str(),
    )
}

fn badge_display_type(source: &Value) -> String {
    choice_or(
        source,
        "badgeDisplayType",
        &BadgeDisplayType::NAMES,
        BadgeDisplayType::default().as_str(),
    )
}

fn should_handle_download_links(source: &Value) -> bool {
    bool_or(
        source,
        "shouldHandleDownloadLinks",
        DEFAULT_SHOULD_HANDLE_DOWNLOAD_LINKS,
    )
}

/// Cached tasks and fetch metadata, carried over as they are.
fn task_cache(source: &Value) -> [(&'static str, Value); 4] {
    [
        ("tasks", array_or_empty(source, "tasks")),
        (
            "taskFetchFailureReason",
            failure_reason_or_null(field(source, "taskFetchFailureReason")),
        ),
        (
            "tasksLastInitiatedFetchTimestamp",
            timestamp_or_null(source, "tasksLastInitiatedFetchTimestamp"),
        ),
        (
            "tasksLastCompletedFetchTimestamp",
            timestamp_or_null(source, "tasksLastCompletedFetchTimestamp"),
        ),
    ]
}

/// Cached tasks and fetch metadata after an incompatible change.
fn empty_task_cache() -> [(&'static str, Value); 4] {
    [
        ("tasks", json!([])),
        ("taskFetchFailureReason", Value::Null),
        ("tasksLastInitiatedFetchTimestamp", Value::Null),
        ("tasksLastCompletedFetchTimestamp", Value::Null),
    ]
}

fn with_fields(mut base: Value, fields: [(&'static str, Value); 4]) -> Value {
    if let Some(object) = base.as_object_mut() {
        for (key, value) in fields {
            object.insert(key.to_string(), value);
        }
    }
    base
}

/// 0 -> 1: give pre-versioning state a tag.
///
/// Unrecognizable input is read as if empty, which yields version 1 defaults.
pub fn tag_legacy_state(raw: &Value) -> Value {
    let source = match classify_legacy(raw) {
        LegacyShape::Empty => missing(),
        LegacyShape::PreVersioning0 | LegacyShape::PreVersioning1 => raw,
    };
    let notifications = group(source, "notifications");

    let base = json!({
        "connection": connection_with_protocol(group(source, "connection")),
        "visibleTasks": visible_tasks(group(source, "visibleTasks")),
        "notifications": {
            "enabled": bool_or(notifications, "enabled", DEFAULT_ENABLE_COMPLETION_NOTIFICATIONS),
            "pollingInterval": seconds(notifications, "pollingInterval")
                .or_else(|| seconds(source, "pollingInterval"))
                .unwrap_or(DEFAULT_COMPLETION_POLLING_INTERVAL_SECS),
        },
        "taskSortType": task_sort_type(source),
        "shouldHandleDownloadLinks": should_handle_download_links(source),
        "cachedTasksVersion": field(source, "cachedTasksVersion").and_then(as_integer).unwrap_or(0),
        "stateVersion": 1,
    });
    with_fields(base, task_cache(source))
}

/// 1 -> 2: split notifications into completion and feedback flags.
///
/// Version 1 task caches are not trusted by version 2, so the cache and its
/// fetch metadata are reset.
pub fn split_notification_flags(raw: &Value) -> Value {
    let notifications = group(raw, "notifications");
    let polling_interval = seconds(notifications, "pollingInterval")
        .or_else(|| seconds(raw, "pollingInterval"))
        .unwrap_or(DEFAULT_COMPLETION_POLLING_INTERVAL_SECS);

    let base = json!({
        "connection": connection_with_protocol(group(raw, "connection")),
        "visibleTasks": visible_tasks(group(raw, "visibleTasks")),
        "notifications": {
            "enableCompletionNotifications": bool_or(notifications, "enabled", true),
            "enableFeedbackNotifications": true,
            "completionPollingInterval": polling_interval,
        },
        "taskSortType": task_sort_type(raw),
        "shouldHandleDownloadLinks": should_handle_download_links(raw),
        "lastSevereError": null,
        "stateVersion": 2,
    });
    with_fields(base, empty_task_cache())
}

/// 2 -> 3: drop the stored severe error, which version 2 kept as a raw
/// error object that does not survive storage.
pub fn clear_severe_error(raw: &Value) -> Value {
    let base = json!({
        "connection": connection_with_protocol(group(raw, "connection")),
        "visibleTasks": visible_tasks(group(raw, "visibleTasks")),
        "notifications": notification_settings(group(raw, "notifications")),
        "taskSortType": task_sort_type(raw),
        "shouldHandleDownloadLinks": should_handle_download_links(raw),
        "lastSevereError": null,
        "stateVersion": 3,
    });
    with_fields(base, task_cache(raw))
}

/// 3 -> 4: introduce the badge display mode.
pub fn add_badge_display_type(raw: &Value) -> Value {
    let base = json!({
        "connection": connection_with_protocol(group(raw, "connection")),
        "visibleTasks": visible_tasks(group(raw, "visibleTasks")),
        "notifications": notification_settings(group(raw, "notifications")),
        "taskSortType": task_sort_type(raw),
        "shouldHandleDownloadLinks": should_handle_download_links(raw),
        "badgeDisplayType": BadgeDisplayType::Total.as_str(),
        "lastSevereError": string_or_null(raw, "lastSevereError"),
        "stateVersion": 4,
    });
    with_fields(base, task_cache(raw))
}

/// 4 -> 5: move the flat settings fields into a `settings` record.
pub fn nest_settings(raw: &Value) -> Value {
    let base = json!({
        "settings": {
            "connection": connection_with_protocol(group(raw, "connection")),
            "visibleTasks": visible_tasks(group(raw, "visibleTasks")),
            "notifications": notification_settings(group(raw, "notifications")),
            "shouldHandleDownloadLinks": should_handle_download_links(raw),
            "taskSortType": task_sort_type(raw),
            "badgeDisplayType": badge_display_type(raw),
        },
        "lastSevereError": string_or_null(raw, "lastSevereError"),
        "stateVersion": 5,
    });
    with_fields(base, task_cache(raw))
}

/// 5 -> 6: drop the connection protocol selector.
pub fn remove_connection_protocol(raw: &Value) -> Value {
    let settings = group(raw, "settings");
    let base = json!({
        "settings": {
            "connection": Value::Object(connection_fields(group(settings, "connection"))),
            "visibleTasks": visible_tasks(group(settings, "visibleTasks")),
            "notifications": notification_settings(group(settings, "notifications")),
            "shouldHandleDownloadLinks": should_handle_download_links(settings),
            "taskSortType": task_sort_type(settings),
            "badgeDisplayType": badge_display_type(settings),
        },
        "lastSevereError": string_or_null(raw, "lastSevereError"),
        "stateVersion": 6,
    });
    with_fields(base, task_cache(raw))
}

/// The ordered steps from version 0 to the canonical version.
pub fn standard_steps() -> Vec<StateMigrationStep> {
    vec![
        StateMigrationStep::upgrade_from(0)
            .with_description("tag pre-versioning state")
            .with_migrator(tag_legacy_state),
        StateMigrationStep::upgrade_from(1)
            .with_description("split notification flags, reset task cache")
            .with_migrator(split_notification_flags),
        StateMigrationStep::upgrade_from(2)
            .with_description("clear stored severe error")
            .with_migrator(clear_severe_error),
        StateMigrationStep::upgrade_from(3)
            .with_description("add badge display type")
            .with_migrator(add_badge_display_type),
        StateMigrationStep::upgrade_from(4)
            .with_description("nest settings")
            .with_migrator(nest_settings),
        StateMigrationStep::upgrade_from(5)
            .with_description("remove connection protocol")
            .with_migrator(remove_connection_protocol),
    ]
}
