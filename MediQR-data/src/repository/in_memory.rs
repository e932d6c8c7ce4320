use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::errors::RepositoryError;

/// In-process key-value storage.
///
/// Holds serialized values exactly like the SQLite `kv_store` table does, so
/// both backends round-trip the same JSON.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the value stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let store = self.values.lock()?;
        Ok(store.get(key).cloned())
    }

    /// Read-modify-write of a single key while holding the lock.
    ///
    /// `apply` receives the current value and returns the new value plus a
    /// result for the caller. Nothing is written when `apply` fails.
    pub fn update<T, F>(&self, key: &str, apply: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(Option<String>) -> Result<(String, T), RepositoryError>,
    {
        let mut store = self.values.lock()?;
        let current = store.get(key).cloned();
        let (value, result) = apply(current)?;
        store.insert(key.to_string(), value);
        Ok(result)
    }
}
