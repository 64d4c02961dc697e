use serde_json::Value;

use super::StateStorage;
use crate::core::Result;

/// Keeps the persisted state in memory. Useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    value: Option<Value>,
    writes: usize,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// How many times `save` was called.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStorage for MemoryStateStorage {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.value.clone())
    }

    fn save(&mut self, state: &Value) -> Result<()> {
        self.value = Some(state.clone());
        self.writes += 1;
        Ok(())
    }
}
