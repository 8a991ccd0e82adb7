use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::ShiftResult;

/// Key-value store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ShiftResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ShiftResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ShiftResult<()> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> ShiftResult<Vec<String>> {
        Ok(self.values.keys().cloned().collect())
    }
}
