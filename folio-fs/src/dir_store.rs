//! Directory-backed key-value store.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use folio_core::{KeyValueStore, StoreError, validate_key};
use log::debug;

use crate::open_or_create_dir;

const EXTENSION: &str = "json";
const PARTIAL_SUFFIX: &str = ".partial";

/// Store keeping each value in `<root>/<escaped key>.json`.
///
/// Writes go to a sibling `.partial` file first and are renamed into place,
/// so readers never observe a half-written value. Any key accepted by
/// [`validate_key`] can be stored: bytes outside `[A-Za-z0-9_@+-]` are
/// written as `%XX`, so separators, dots and drive colons never reach the
/// filesystem verbatim and distinct keys never share a file.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use folio_core::KeyValueStore;
/// use folio_fs::DirStore;
///
/// let store = DirStore::open(Utf8Path::new("cache"))?;
/// store.set("bc_user_recommendations_guest", "[]")?;
/// # Ok::<(), folio_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct DirStore {
    root: Utf8PathBuf,
    dir: Dir,
}

impl DirStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> Result<Self, StoreError> {
        let dir = open_or_create_dir(root).map_err(|source| StoreError::Io {
            key: root.to_string(),
            source,
        })?;
        debug!("opened directory store at {root}");
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<String, StoreError> {
        validate_key(key)?;
        Ok(format!("{}.{EXTENSION}", escape_key(key)))
    }
}

fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'@' | b'+') {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let name = Self::file_name(key)?;
        match self.dir.read_to_string(&name) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key)(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let name = Self::file_name(key)?;
        let partial = format!("{name}{PARTIAL_SUFFIX}");
        self.dir.write(&partial, value).map_err(io_error(key))?;
        self.dir
            .rename(&partial, &self.dir, &name)
            .map_err(io_error(key))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let name = Self::file_name(key)?;
        match self.dir.remove_file(&name) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(io_error(key)(err)),
            _ => Ok(()),
        }
    }
}
