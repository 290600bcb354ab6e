//! Providers reading JSON files from disk.
//!
//! Files are re-read on every call so edits show up without restarting.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use folio_core::{
    BookRecord, CatalogProvider, InteractionRecord, LibraryProvider, ProviderError, UserKey,
};
use folio_fs::read_utf8_file;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

fn load<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ProviderError> {
    let raw = read_utf8_file(path).map_err(|err| ProviderError::Io {
        origin: path.to_string(),
        message: err.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|err| ProviderError::Parse {
        origin: path.to_string(),
        message: err.to_string(),
    })
}

/// Catalog stored as a JSON array of book records.
///
/// Fields beyond the ones the engine reads are kept in
/// [`BookRecord::extra`] and survive into recommendations.
///
/// # Examples
/// ```no_run
/// use folio_core::CatalogProvider;
/// use folio_data::JsonCatalog;
///
/// let catalog = JsonCatalog::new("books.json");
/// let books = catalog.books()?;
/// # Ok::<(), folio_core::ProviderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: Utf8PathBuf,
}

impl JsonCatalog {
    /// Read the catalog from `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CatalogProvider for JsonCatalog {
    fn books(&self) -> Result<Vec<BookRecord>, ProviderError> {
        let books: Vec<BookRecord> = load(&self.path)?;
        debug!("loaded {} books from {}", books.len(), self.path);
        Ok(books)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LibraryFile {
    Shared(Vec<InteractionRecord>),
    PerUser(HashMap<String, Vec<InteractionRecord>>),
}

/// Library stored as JSON.
///
/// The file holds either an array of interaction records, seen by every
/// user, or an object mapping user keys to arrays. Users missing from the
/// object have an empty library.
#[derive(Debug, Clone)]
pub struct JsonLibrary {
    path: Utf8PathBuf,
}

impl JsonLibrary {
    /// Read interactions from `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the library file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl LibraryProvider for JsonLibrary {
    fn interactions(&self, user: &UserKey) -> Result<Vec<InteractionRecord>, ProviderError> {
        let records = match load::<LibraryFile>(&self.path)? {
            LibraryFile::Shared(records) => records,
            LibraryFile::PerUser(mut users) => users.remove(user.as_str()).unwrap_or_default(),
        };
        debug!(
            "loaded {} interactions for {user} from {}",
            records.len(),
            self.path
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use tempfile::TempDir;

    struct Files {
        temp: TempDir,
    }

    impl Files {
        fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
            let path = Utf8PathBuf::from_path_buf(self.temp.path().join(name)).expect("utf8 path");
            std::fs::write(&path, contents).expect("write fixture");
            path
        }
    }

    #[fixture]
    fn files() -> Files {
        Files {
            temp: TempDir::new().expect("temp dir"),
        }
    }

    #[rstest]
    fn catalog_keeps_unknown_fields(files: Files) {
        let path = files.write(
            "books.json",
            r#"[{"isbn":"978-1","title":"Dune","genre":"Scifi","image":"cover.jpg","pages":412}]"#,
        );
        let books = JsonCatalog::new(path).books().expect("load catalog");
        let book = books.first().expect("one book");
        assert_eq!(book.genre.as_deref(), Some("Scifi"));
        assert_eq!(book.extra.get("image"), Some(&json!("cover.jpg")));
        assert_eq!(book.extra.get("pages"), Some(&json!(412)));
    }

    #[rstest]
    fn missing_catalog_is_an_io_error(files: Files) {
        let path = Utf8PathBuf::from_path_buf(files.temp.path().join("absent.json"))
            .expect("utf8 path");
        let err = JsonCatalog::new(path).books().expect_err("missing file");
        assert!(matches!(err, ProviderError::Io { .. }));
    }

    #[rstest]
    fn malformed_catalog_is_a_parse_error(files: Files) {
        let path = files.write("books.json", "{not json");
        let err = JsonCatalog::new(path).books().expect_err("bad json");
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[rstest]
    fn flat_library_is_shared_by_all_users(files: Files) {
        let path = files.write("library.json", r#"[{"isbn":"A","saved":true}]"#);
        let library = JsonLibrary::new(path);
        for user in [UserKey::guest(), UserKey::new("reader")] {
            let records = library.interactions(&user).expect("load library");
            assert_eq!(records.len(), 1);
        }
    }

    #[rstest]
    fn keyed_library_selects_the_user(files: Files) {
        let path = files.write(
            "library.json",
            r#"{"reader":[{"isbn":"A","favorite":true},{"isbn":"B"}],"other":[]}"#,
        );
        let library = JsonLibrary::new(path);
        let records = library
            .interactions(&UserKey::new("reader"))
            .expect("load library");
        assert_eq!(records.len(), 2);
        assert!(records.first().is_some_and(|record| record.favorite));
        let missing = library
            .interactions(&UserKey::new("stranger"))
            .expect("load library");
        assert!(missing.is_empty());
    }
}
