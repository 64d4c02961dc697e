use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Invalid migration plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid canonical state: {0}")]
    InvalidCanonicalState(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, StateError>;

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::IoError(err.to_string())
    }
}
