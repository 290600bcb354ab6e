//! Process-local [`KeyValueStore`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{KeyValueStore, StoreError, validate_key};

/// In-memory store backed by a mutex-guarded map.
///
/// Values vanish when the store is dropped; useful for tests and for
/// sessions that need no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys. Returns `0` when the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Report whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Report whether `key` holds a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock()
            .is_ok_and(|entries| entries.contains_key(key))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}
