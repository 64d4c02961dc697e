use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MISSING_CONFIG: &str = "missing-config";
const FAILURE_MESSAGE_KEY: &str = "failureMessage";

/// Why the last task fetch failed.
///
/// Persisted either as the bare string `"missing-config"` or as
/// `{"failureMessage": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum TaskFetchFailureReason {
    MissingConfig,
    Failure { message: String },
}

impl TaskFetchFailureReason {
    /// Reads a persisted failure reason, ignoring unknown extra fields.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(keyword) if keyword == MISSING_CONFIG => Some(Self::MissingConfig),
            Value::Object(object) => object
                .get(FAILURE_MESSAGE_KEY)
                .and_then(Value::as_str)
                .map(|message| Self::Failure {
                    message: message.to_string(),
                }),
            _ => None,
        }
    }
}

impl TryFrom<Value> for TaskFetchFailureReason {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value).ok_or_else(|| {
            format!(
                "expected \"{}\" or {{\"{}\": string}}, got {}",
                MISSING_CONFIG, FAILURE_MESSAGE_KEY, value
            )
        })
    }
}

impl From<TaskFetchFailureReason> for Value {
    fn from(reason: TaskFetchFailureReason) -> Self {
        match reason {
            TaskFetchFailureReason::MissingConfig => Value::String(MISSING_CONFIG.to_string()),
            TaskFetchFailureReason::Failure { message } => {
                let mut object = Map::new();
                object.insert(FAILURE_MESSAGE_KEY.to_string(), Value::String(message));
                Value::Object(object)
            }
        }
    }
}

/// Normalizes a persisted failure reason to its canonical JSON, or `null`.
pub fn failure_reason_or_null(value: Option<&Value>) -> Value {
    value
        .and_then(TaskFetchFailureReason::from_json)
        .map(Value::from)
        .unwrap_or(Value::Null)
}
