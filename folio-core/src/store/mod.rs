//! Persistent string key-value storage.
//!
//! Caches serialise their entries to JSON and write them through a
//! [`KeyValueStore`]. The engine ships an in-memory store and, behind the
//! `store-sqlite` feature, a SQLite-backed one. The `folio-fs` crate adds a
//! directory-backed store.

use std::io;
use std::sync::Arc;

use thiserror::Error;

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteStore;

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key is empty or contains characters the backend cannot hold.
    #[error("invalid store key: {key:?}")]
    InvalidKey {
        /// Offending key.
        key: String,
    },
    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
    /// Filesystem access failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The backend refused the operation.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The SQLite database could not be opened or initialised.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open store database at {path}: {source}")]
    OpenDatabase {
        /// Path of the database file.
        path: String,
        /// Underlying error.
        #[source]
        source: rusqlite::Error,
    },
    /// A SQLite statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("database error for key {key}: {source}")]
    Database {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: rusqlite::Error,
    },
}

/// String-keyed storage shared by the caches.
///
/// Implementations must be safe to share between threads. Writes replace
/// any existing value; removing a missing key is not an error.
///
/// # Examples
/// ```
/// use folio_core::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("greeting", "hello")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
/// store.remove("greeting")?;
/// assert!(store.get("greeting")?.is_none());
/// # Ok::<(), folio_core::StoreError>(())
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value stored under `key`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Reject keys no backend can hold.
///
/// # Errors
/// Returns [`StoreError::InvalidKey`] for empty or whitespace-only keys and
/// for keys containing control characters.
pub fn validate_key(key: &str) -> Result<&str, StoreError> {
    if key.trim().is_empty() || key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey {
            key: key.to_owned(),
        });
    }
    Ok(key)
}
