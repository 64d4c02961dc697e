//! Version detection
//!
//! Classification policy, checked in order:
//!
//! 1. A numeric `stateVersion` tag is reported verbatim, without range checks.
//! 2. A top-level `taskSortType` marks the second pre-versioning shape.
//! 3. Any of `connection`, `visibleTasks`, `notifications` (objects) or
//!    `tasks` (array) marks the first pre-versioning shape.
//! 4. Anything else (`null`, `{}`, scalars, unrelated objects) is empty.
//!
//! All unversioned outcomes are version 0.

use std::fmt;

use serde_json::Value;

use crate::core::{STATE_VERSION_KEY, UNVERSIONED_STATE_VERSION};
use crate::json::accessors::{as_integer, field};

/// Shape of state persisted before version tags existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyShape {
    /// Nothing recognizable.
    Empty,
    /// Connection, visibility, notification and task cache fields only.
    PreVersioning0,
    /// Adds task sorting and download-link handling.
    PreVersioning1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedVersion {
    /// An integral numeric `stateVersion` tag.
    Tagged(i64),
    /// A numeric `stateVersion` tag with a fractional part.
    NonIntegral,
    /// No usable tag.
    Unversioned(LegacyShape),
}

impl DetectedVersion {
    /// The version number the value declares, `None` for non-integral tags.
    pub fn number(&self) -> Option<i64> {
        match self {
            DetectedVersion::Tagged(version) => Some(*version),
            DetectedVersion::NonIntegral => None,
            DetectedVersion::Unversioned(_) => Some(i64::from(UNVERSIONED_STATE_VERSION)),
        }
    }

    /// The registry index to start from, if the version is below `latest`.
    pub fn registry_index(&self, latest: u32) -> Option<u32> {
        self.number()
            .and_then(|version| u32::try_from(version).ok())
            .filter(|version| *version < latest)
    }
}

impl fmt::Display for DetectedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedVersion::Tagged(version) => write!(f, "version {}", version),
            DetectedVersion::NonIntegral => f.write_str("non-integral version tag"),
            DetectedVersion::Unversioned(LegacyShape::Empty) => f.write_str("version 0 (empty)"),
            DetectedVersion::Unversioned(LegacyShape::PreVersioning0) => {
                f.write_str("version 0 (pre-versioning 0)")
            }
            DetectedVersion::Unversioned(LegacyShape::PreVersioning1) => {
                f.write_str("version 0 (pre-versioning 1)")
            }
        }
    }
}

/// Determines which schema version `raw` conforms to. Never fails.
pub fn detect_version(raw: &Value) -> DetectedVersion {
    match field(raw, STATE_VERSION_KEY) {
        Some(tag @ Value::Number(_)) => match as_integer(tag) {
            Some(version) => DetectedVersion::Tagged(version),
            None => DetectedVersion::NonIntegral,
        },
        _ => DetectedVersion::Unversioned(classify_legacy(raw)),
    }
}

/// Applies the ordered legacy-marker predicates to an untagged value.
pub fn classify_legacy(raw: &Value) -> LegacyShape {
    let Some(object) = raw.as_object() else {
        return LegacyShape::Empty;
    };

    if object.contains_key("taskSortType") {
        return LegacyShape::PreVersioning1;
    }

    let has_group = ["connection", "visibleTasks", "notifications"]
        .iter()
        .any(|key| object.get(*key).is_some_and(Value::is_object));
    let has_tasks = object.get("tasks").is_some_and(Value::is_array);

    if has_group || has_tasks {
        LegacyShape::PreVersioning0
    } else {
        LegacyShape::Empty
    }
}
