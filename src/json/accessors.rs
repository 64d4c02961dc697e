//! Defensive field readers
//!
//! Historical state shapes are read as untyped JSON. Every reader here takes
//! the fallback the caller wants when the field is absent or carries the wrong
//! JSON type, so transforms never propagate a hole into the next version.

use serde_json::Value;

static MISSING: Value = Value::Null;

/// A `null` that outlives any borrowed state, for "read nothing" paths.
pub fn missing() -> &'static Value {
    &MISSING
}

/// Returns the field when `value` is an object that has it.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|object| object.get(key))
}

/// Returns the nested object under `key`, or `Value::Null` so lookups on it
/// keep falling back.
pub fn group<'a>(value: &'a Value, key: &str) -> &'a Value {
    match field(value, key) {
        Some(nested @ Value::Object(_)) => nested,
        _ => &MISSING,
    }
}

pub fn bool_or(value: &Value, key: &str, default: bool) -> bool {
    field(value, key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn string_or(value: &Value, key: &str, default: &str) -> String {
    field(value, key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Reads a JSON number that holds an exact integer, including `3.0`.
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(integer) = value.as_i64() {
        return Some(integer);
    }
    let float = value.as_f64()?;
    if float.is_finite() && float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64
    {
        Some(float as i64)
    } else {
        None
    }
}

/// Reads a TCP port, rejecting anything outside `0..=65535`.
pub fn port_or(value: &Value, key: &str, default: u16) -> u16 {
    field(value, key)
        .and_then(as_integer)
        .and_then(|port| u16::try_from(port).ok())
        .unwrap_or(default)
}

/// Reads a non-negative whole number of seconds.
pub fn seconds(value: &Value, key: &str) -> Option<u64> {
    field(value, key)
        .and_then(as_integer)
        .and_then(|seconds| u64::try_from(seconds).ok())
}

/// Reads a millisecond timestamp, or `null` when absent or malformed.
pub fn timestamp_or_null(value: &Value, key: &str) -> Value {
    field(value, key)
        .and_then(as_integer)
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// Reads a string restricted to `allowed`, falling back to `default`.
pub fn choice_or(value: &Value, key: &str, allowed: &[&str], default: &str) -> String {
    field(value, key)
        .and_then(Value::as_str)
        .filter(|candidate| allowed.contains(candidate))
        .unwrap_or(default)
        .to_string()
}

/// Clones the array under `key`, or returns an empty one.
pub fn array_or_empty(value: &Value, key: &str) -> Value {
    match field(value, key) {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        _ => Value::Array(Vec::new()),
    }
}

/// Reads a string message, or `null` when absent or not a string.
pub fn string_or_null(value: &Value, key: &str) -> Value {
    field(value, key)
        .and_then(Value::as_str)
        .map(|message| Value::String(message.to_string()))
        .unwrap_or(Value::Null)
}
