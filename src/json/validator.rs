//! Canonical State Validator
//!
//! Checks that a value carries every field of the latest schema with the
//! right JSON type. Uses the Chain of Responsibility pattern: each rule checks
//! one concern and the first failure wins.

use serde_json::{Map, Value};

use crate::core::{LATEST_STATE_VERSION, Result, STATE_VERSION_KEY, StateError};
use crate::state::fetch::TaskFetchFailureReason;
use crate::state::settings::{BadgeDisplayType, TaskSortType};

/// Trait for validation rules (Chain of Responsibility pattern)
pub trait ValidationRule: Send + Sync {
    fn validate(&self, state: &Map<String, Value>) -> Result<()>;
}

fn invalid(message: impl Into<String>) -> StateError {
    StateError::InvalidCanonicalState(message.into())
}

fn require<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| invalid(format!("missing field '{}{}'", path, key)))
}

fn require_object<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Map<String, Value>> {
    require(object, key, path)?
        .as_object()
        .ok_or_else(|| invalid(format!("field '{}{}' must be an object", path, key)))
}

fn require_bool(object: &Map<String, Value>, key: &str, path: &str) -> Result<()> {
    if require(object, key, path)?.is_boolean() {
        Ok(())
    } else {
        Err(invalid(format!("field '{}{}' must be a boolean", path, key)))
    }
}

fn require_string(object: &Map<String, Value>, key: &str, path: &str) -> Result<()> {
    if require(object, key, path)?.is_string() {
        Ok(())
    } else {
        Err(invalid(format!("field '{}{}' must be a string", path, key)))
    }
}

fn require_integer_in(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    max: u64,
) -> Result<()> {
    match require(object, key, path)?.as_u64() {
        Some(number) if number <= max => Ok(()),
        _ => Err(invalid(format!(
            "field '{}{}' must be an integer between 0 and {}",
            path, key, max
        ))),
    }
}

fn require_nullable_timestamp(object: &Map<String, Value>, key: &str) -> Result<()> {
    let value = require(object, key, "")?;
    if value.is_null() || value.is_i64() {
        Ok(())
    } else {
        Err(invalid(format!("field '{}' must be an integer or null", key)))
    }
}

fn require_choice(object: &Map<String, Value>, key: &str, path: &str, allowed: &[&str]) -> Result<()> {
    match require(object, key, path)?.as_str() {
        Some(choice) if allowed.contains(&choice) => Ok(()),
        _ => Err(invalid(format!(
            "field '{}{}' must be one of {}",
            path,
            key,
            allowed.join(", ")
        ))),
    }
}

/// Validates that the state is tagged with the latest version
#[derive(Debug, Clone, Default)]
pub struct VersionTagRule;

impl ValidationRule for VersionTagRule {
    fn validate(&self, state: &Map<String, Value>) -> Result<()> {
        let tag = require(state, STATE_VERSION_KEY, "")?;
        match tag.as_u64() {
            Some(version) if version == u64::from(LATEST_STATE_VERSION) => Ok(()),
            _ => Err(invalid(format!(
                "'{}' must be {}, got {}",
                STATE_VERSION_KEY, LATEST_STATE_VERSION, tag
            ))),
        }
    }
}

/// Validates task cache and fetch metadata fields
#[derive(Debug, Clone, Default)]
pub struct FetchMetadataRule;

impl ValidationRule for FetchMetadataRule {
    fn validate(&self, state: &Map<String, Value>) -> Result<()> {
        if !require(state, "tasks", "")?.is_array() {
            return Err(invalid("field 'tasks' must be an array"));
        }

        let reason = require(state, "taskFetchFailureReason", "")?;
        if !reason.is_null() && TaskFetchFailureReason::from_json(reason).is_none() {
            return Err(invalid(format!(
                "field 'taskFetchFailureReason' is not a known failure reason: {}",
                reason
            )));
        }

        require_nullable_timestamp(state, "tasksLastInitiatedFetchTimestamp")?;
        require_nullable_timestamp(state, "tasksLastCompletedFetchTimestamp")?;

        let severe = require(state, "lastSevereError", "")?;
        if !severe.is_null() && !severe.is_string() {
            return Err(invalid("field 'lastSevereError' must be a string or null"));
        }

        Ok(())
    }
}

/// Validates the nested settings groups
#[derive(Debug, Clone, Default)]
pub struct SettingsShapeRule;

impl ValidationRule for SettingsShapeRule {
    fn validate(&self, state: &Map<String, Value>) -> Result<()> {
        let settings = require_object(state, "settings", "")?;

        let connection = require_object(settings, "connection", "settings.")?;
        require_string(connection, "hostname", "settings.connection.")?;
        require_integer_in(connection, "port", "settings.connection.", u64::from(u16::MAX))?;
        require_string(connection, "username", "settings.connection.")?;
        require_string(connection, "password", "settings.connection.")?;

        let visible = require_object(settings, "visibleTasks", "settings.")?;
        for category in ["downloading", "uploading", "completed", "errored", "other"] {
            require_bool(visible, category, "settings.visibleTasks.")?;
        }

        let notifications = require_object(settings, "notifications", "settings.")?;
        require_bool(notifications, "enableCompletionNotifications", "settings.notifications.")?;
        require_bool(notifications, "enableFeedbackNotifications", "settings.notifications.")?;
        require_integer_in(
            notifications,
            "completionPollingInterval",
            "settings.notifications.",
            u64::MAX,
        )?;

        require_bool(settings, "shouldHandleDownloadLinks", "settings.")
    }
}

/// Validates enumerated settings values
#[derive(Debug, Clone, Default)]
pub struct SettingsChoiceRule;

impl ValidationRule for SettingsChoiceRule {
    fn validate(&self, state: &Map<String, Value>) -> Result<()> {
        let settings = require_object(state, "settings", "")?;
        require_choice(settings, "taskSortType", "settings.", &TaskSortType::NAMES)?;
        require_choice(settings, "badgeDisplayType", "settings.", &BadgeDisplayType::NAMES)
    }
}

/// Main canonical-shape validator using Chain of Responsibility
pub struct CanonicalStateValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl CanonicalStateValidator {
    /// Create validator with default rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(VersionTagRule),
                Box::new(FetchMetadataRule),
                Box::new(SettingsShapeRule),
                Box::new(SettingsChoiceRule),
            ],
        }
    }

    /// Create validator with custom rules
    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Validate a state value against all rules
    pub fn validate(&self, state: &Value) -> Result<()> {
        let object = state
            .as_object()
            .ok_or_else(|| invalid("state must be a JSON object"))?;

        for rule in &self.rules {
            rule.validate(object)?;
        }

        Ok(())
    }
}

impl Default for CanonicalStateValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `state` fully conforms to the latest schema.
pub fn is_canonical(state: &Value) -> bool {
    CanonicalStateValidator::new().validate(state).is_ok()
}
