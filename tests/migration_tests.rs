use std::borrow::Cow;

use serde_json::{Value, json};
use station_state::{
    LATEST_STATE_VERSION, State, build_default_state, is_canonical, migrate_state,
};

fn dummy_task() -> Value {
    json!({
        "id": "id",
        "type": "http",
        "username": "username",
        "title": "title",
        "size": 0,
        "status": "downloading"
    })
}

fn legacy_connection() -> Value {
    json!({
        "protocol": "http",
        "hostname": "hostname",
        "port": 0,
        "username": "username",
        "password": "password"
    })
}

fn mixed_visibility() -> Value {
    json!({
        "downloading": true,
        "uploading": false,
        "completed": true,
        "errored": false,
        "other": true
    })
}

fn all_visible() -> Value {
    json!({
        "downloading": true,
        "uploading": true,
        "completed": true,
        "errored": true,
        "other": true
    })
}

fn split_notifications() -> Value {
    json!({
        "enableCompletionNotifications": true,
        "enableFeedbackNotifications": true,
        "completionPollingInterval": 0
    })
}

fn canonical(visible_tasks: Value, tasks: Value, failure: Value, timestamp: Value) -> Value {
    json!({
        "settings": {
            "connection": {
                "hostname": "hostname",
                "port": 0,
                "username": "username",
                "password": "password"
            },
            "visibleTasks": visible_tasks,
            "notifications": split_notifications(),
            "shouldHandleDownloadLinks": true,
            "taskSortType": "name-asc",
            "badgeDisplayType": "total"
        },
        "tasks": tasks,
        "taskFetchFailureReason": failure,
        "tasksLastCompletedFetchTimestamp": timestamp.clone(),
        "tasksLastInitiatedFetchTimestamp": timestamp,
        "lastSevereError": null,
        "stateVersion": 6
    })
}

fn canonical_with_reset_cache() -> Value {
    canonical(mixed_visibility(), json!([]), Value::Null, Value::Null)
}

fn canonical_with_cache(visible_tasks: Value) -> Value {
    canonical(visible_tasks, json!([dummy_task()]), json!("missing-config"), json!(0))
}

fn assert_transition(before: Value, after: Value) {
    let original = before.clone();
    let migrated = migrate_state(&before);

    assert_ne!(before, after);
    assert_eq!(before, original);
    assert!(matches!(migrated, Cow::Owned(_)));
    assert_eq!(migrated.into_owned(), after);
}

#[test]
fn test_updates_from_pre_versioning_0() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": {"enabled": true, "pollingInterval": 0},
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0
        }),
        canonical_with_reset_cache(),
    );
}

#[test]
fn test_updates_from_pre_versioning_1() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": {"enabled": true, "pollingInterval": 0},
            "taskSortType": "name-asc",
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "shouldHandleDownloadLinks": true,
            "cachedTasksVersion": 0
        }),
        canonical_with_reset_cache(),
    );
}

#[test]
fn test_updates_degenerate_tasks_only_state() {
    assert_transition(json!({"tasks": []}), build_default_state());
}

#[test]
fn test_updates_from_no_state() {
    assert_transition(Value::Null, build_default_state());
}

#[test]
fn test_updates_from_version_1_and_resets_task_cache() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": {"enabled": true, "pollingInterval": 0},
            "cachedTasksVersion": 1,
            "taskSortType": "name-asc",
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "shouldHandleDownloadLinks": true,
            "stateVersion": 1
        }),
        canonical_with_reset_cache(),
    );
}

#[test]
fn test_updates_from_version_2_keeping_tasks() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": split_notifications(),
            "taskSortType": "name-asc",
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "shouldHandleDownloadLinks": true,
            "lastSevereError": {"name": "Error", "message": ""},
            "stateVersion": 2
        }),
        canonical_with_cache(mixed_visibility()),
    );
}

#[test]
fn test_updates_erroneous_version_2_missing_fields() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": split_notifications(),
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "lastSevereError": {"name": "Error", "message": ""},
            "stateVersion": 2
        }),
        canonical_with_cache(mixed_visibility()),
    );
}

#[test]
fn test_adds_badge_display_type_from_version_3() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": split_notifications(),
            "shouldHandleDownloadLinks": true,
            "taskSortType": "name-asc",
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "lastSevereError": null,
            "stateVersion": 3
        }),
        canonical_with_cache(mixed_visibility()),
    );
}

#[test]
fn test_nests_settings_from_version_4() {
    assert_transition(
        json!({
            "connection": legacy_connection(),
            "visibleTasks": all_visible(),
            "notifications": split_notifications(),
            "shouldHandleDownloadLinks": true,
            "taskSortType": "name-asc",
            "badgeDisplayType": "total",
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "lastSevereError": null,
            "stateVersion": 4
        }),
        canonical_with_cache(all_visible()),
    );
}

#[test]
fn test_removes_protocol_from_version_5() {
    assert_transition(
        json!({
            "settings": {
                "connection": legacy_connection(),
                "visibleTasks": all_visible(),
                "notifications": split_notifications(),
                "shouldHandleDownloadLinks": true,
                "taskSortType": "name-asc",
                "badgeDisplayType": "total"
            },
            "tasks": [dummy_task()],
            "taskFetchFailureReason": "missing-config",
            "tasksLastCompletedFetchTimestamp": 0,
            "tasksLastInitiatedFetchTimestamp": 0,
            "lastSevereError": null,
            "stateVersion": 5
        }),
        canonical_with_cache(all_visible()),
    );
}

#[test]
fn test_latest_state_is_returned_by_reference() {
    let before = canonical_with_cache(all_visible());
    let migrated = migrate_state(&before);

    match migrated {
        Cow::Borrowed(inner) => assert!(std::ptr::eq(inner, &before)),
        Cow::Owned(_) => panic!("latest state should not be copied"),
    }
}

#[test]
fn test_too_new_version_collapses_to_defaults() {
    let too_new = migrate_state(&json!({"stateVersion": 999})).into_owned();
    let empty = migrate_state(&json!({})).into_owned();

    assert_eq!(too_new, empty);
    assert_eq!(too_new, build_default_state());
}

#[test]
fn test_negative_and_fractional_versions_collapse_to_defaults() {
    for raw in [
        json!({"stateVersion": -1, "tasks": [dummy_task()]}),
        json!({"stateVersion": 2.5, "tasks": [dummy_task()]}),
    ] {
        assert_eq!(migrate_state(&raw).into_owned(), build_default_state());
    }
}

#[test]
fn test_garbage_input_always_yields_canonical_state() {
    let inputs = [
        Value::Null,
        json!({}),
        json!([]),
        json!([1, "two", null]),
        json!(42),
        json!("state"),
        json!(true),
        json!({"stateVersion": "6"}),
        json!({"stateVersion": null, "connection": "not an object"}),
        json!({"connection": {"port": "5000", "hostname": 12}, "tasks": {"0": "x"}}),
        json!({"stateVersion": 1, "notifications": [], "visibleTasks": null}),
        json!({"stateVersion": 2, "taskFetchFailureReason": 17, "tasks": "none"}),
        json!({"stateVersion": 3, "lastSevereError": {"stack": "..."}}),
        json!({"stateVersion": 4, "badgeDisplayType": "sideways"}),
        json!({"stateVersion": 5}),
        json!({"stateVersion": 5, "settings": "flat"}),
        json!({"stateVersion": 0, "taskSortType": 9}),
    ];

    for raw in inputs {
        let migrated = migrate_state(&raw);
        assert!(is_canonical(&migrated), "not canonical for {}: {}", raw, migrated);
        assert!(State::from_value(&migrated).is_ok());
        assert_eq!(migrated["stateVersion"], json!(LATEST_STATE_VERSION));
    }
}

#[test]
fn test_migration_never_mutates_input() {
    let raw = json!({
        "connection": legacy_connection(),
        "notifications": {"enabled": false, "pollingInterval": 30},
        "tasks": [dummy_task()],
        "extra": {"nested": [1, 2, 3]},
        "stateVersion": 1
    });
    let snapshot = raw.clone();

    let _ = migrate_state(&raw);
    assert_eq!(raw, snapshot);
}

#[test]
fn test_chain_composition_is_consistent_across_entry_points() {
    let version_2 = json!({
        "connection": legacy_connection(),
        "visibleTasks": mixed_visibility(),
        "notifications": split_notifications(),
        "taskSortType": "timestamp-added-desc",
        "shouldHandleDownloadLinks": false,
        "tasks": [dummy_task()],
        "taskFetchFailureReason": {"failureMessage": "timeout"},
        "tasksLastCompletedFetchTimestamp": 10,
        "tasksLastInitiatedFetchTimestamp": 20,
        "lastSevereError": null,
        "stateVersion": 2
    });

    let mut version_3 = version_2.clone();
    version_3["stateVersion"] = json!(3);

    let mut version_4 = version_3.clone();
    version_4["badgeDisplayType"] = json!("total");
    version_4["stateVersion"] = json!(4);

    let version_5 = json!({
        "settings": {
            "connection": legacy_connection(),
            "visibleTasks": mixed_visibility(),
            "notifications": split_notifications(),
            "shouldHandleDownloadLinks": false,
            "taskSortType": "timestamp-added-desc",
            "badgeDisplayType": "total"
        },
        "tasks": [dummy_task()],
        "taskFetchFailureReason": {"failureMessage": "timeout"},
        "tasksLastCompletedFetchTimestamp": 10,
        "tasksLastInitiatedFetchTimestamp": 20,
        "lastSevereError": null,
        "stateVersion": 5
    });

    let expected = migrate_state(&version_2).into_owned();
    for entry in [version_3, version_4, version_5] {
        assert_eq!(migrate_state(&entry).into_owned(), expected);
    }

    let typed = State::from_value(&expected).unwrap();
    assert!(!typed.settings.should_handle_download_links);
    assert_eq!(typed.tasks_last_initiated_fetch_timestamp, Some(20));
}

#[test]
fn test_legacy_entry_points_agree_on_settings() {
    let pre_versioning = json!({
        "connection": legacy_connection(),
        "visibleTasks": mixed_visibility(),
        "notifications": {"enabled": false, "pollingInterval": 45},
        "taskSortType": "completed-percent-desc",
        "shouldHandleDownloadLinks": false
    });
    let mut version_1 = pre_versioning.clone();
    version_1["cachedTasksVersion"] = json!(1);
    version_1["stateVersion"] = json!(1);

    let from_legacy = migrate_state(&pre_versioning).into_owned();
    assert_eq!(migrate_state(&version_1).into_owned(), from_legacy);
    assert_eq!(
        from_legacy["settings"]["notifications"],
        json!({
            "enableCompletionNotifications": false,
            "enableFeedbackNotifications": true,
            "completionPollingInterval": 45
        })
    );
    assert_eq!(from_legacy["settings"]["taskSortType"], json!("completed-percent-desc"));
}

#[test]
fn test_flat_polling_interval_survives_from_every_legacy_entry_point() {
    let pre_versioning = json!({
        "connection": legacy_connection(),
        "pollingInterval": 15
    });
    let mut version_1 = pre_versioning.clone();
    version_1["stateVersion"] = json!(1);

    for raw in [&pre_versioning, &version_1] {
        let migrated = migrate_state(raw);
        assert_eq!(
            migrated["settings"]["notifications"]["completionPollingInterval"],
            json!(15)
        );
    }
}

#[test]
fn test_migrated_state_is_stable_on_second_pass() {
    let migrated = migrate_state(&json!({"tasks": []})).into_owned();
    let again = migrate_state(&migrated);
    assert!(matches!(again, Cow::Borrowed(_)));
}
