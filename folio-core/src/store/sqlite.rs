//! SQLite-backed [`KeyValueStore`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use super::{KeyValueStore, StoreError, validate_key};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS folio_kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";
const SELECT_VALUE: &str = "SELECT value FROM folio_kv WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO folio_kv (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value";
const DELETE_VALUE: &str = "DELETE FROM folio_kv WHERE key = ?1";

/// Store persisting entries in a single SQLite table.
///
/// # Examples
/// ```
/// use folio_core::{KeyValueStore, SqliteStore};
///
/// let store = SqliteStore::open_in_memory()?;
/// store.set("k", "v")?;
/// assert_eq!(store.get("k")?.as_deref(), Some("v"));
/// # Ok::<(), folio_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    ///
    /// # Errors
    /// Returns [`StoreError::OpenDatabase`] when the file cannot be opened
    /// or the table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let connection = Connection::open(path).map_err(|source| StoreError::OpenDatabase {
            path: display.clone(),
            source,
        })?;
        Self::initialise(connection, display)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`StoreError::OpenDatabase`] when SQLite cannot allocate the
    /// database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let display = String::from(":memory:");
        let connection =
            Connection::open_in_memory().map_err(|source| StoreError::OpenDatabase {
                path: display.clone(),
                source,
            })?;
        Self::initialise(connection, display)
    }

    fn initialise(connection: Connection, path: String) -> Result<Self, StoreError> {
        connection
            .execute(CREATE_TABLE, [])
            .map_err(|source| StoreError::OpenDatabase { path, source })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn database_error(key: &str) -> impl FnOnce(rusqlite::Error) -> StoreError + '_ {
    move |source| StoreError::Database {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let connection = self.lock()?;
        let mut statement = connection
            .prepare_cached(SELECT_VALUE)
            .map_err(database_error(key))?;
        statement
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()
            .map_err(database_error(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock()?
            .execute(UPSERT_VALUE, params![key, value])
            .map_err(database_error(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock()?
            .execute(DELETE_VALUE, params![key])
            .map_err(database_error(key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn upsert_replaces_value() {
        let store = SqliteStore::open_in_memory().expect("open store");
        store.set("k", "one").expect("insert");
        store.set("k", "two").expect("update");
        assert_eq!(store.get("k").expect("get").as_deref(), Some("two"));
    }

    #[rstest]
    fn values_survive_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cache.sqlite");
        {
            let store = SqliteStore::open(&path).expect("open store");
            store.set("user", "payload").expect("set");
        }
        let reopened = SqliteStore::open(&path).expect("reopen store");
        assert_eq!(
            reopened.get("user").expect("get").as_deref(),
            Some("payload")
        );
    }

    #[rstest]
    fn remove_deletes_row() {
        let store = SqliteStore::open_in_memory().expect("open store");
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
        assert!(store.get("k").expect("get").is_none());
    }
}
