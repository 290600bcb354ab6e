//! Test helpers for writing catalog and library fixtures to disk.

use camino::{Utf8Path, Utf8PathBuf};
use folio_core::{BookRecord, InteractionRecord};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding the files a command reads.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn catalog_path(&self) -> Utf8PathBuf {
        self.path("books.json")
    }

    pub(super) fn library_path(&self) -> Utf8PathBuf {
        self.path("library.json")
    }

    pub(super) fn write_catalog(&self, books: &[BookRecord]) {
        let payload = serde_json::to_vec_pretty(books).expect("serialise catalog");
        write_utf8(&self.catalog_path(), &payload);
    }

    pub(super) fn write_library(&self, user: &str, records: &[InteractionRecord]) {
        let payload = serde_json::to_vec_pretty(&HashMap::from([(user, records)])).expect("serialise library");
        write_utf8(&self.library_path(), &payload);
    }
}

/// Catalog with `fantasy` fantasy titles followed by `romance` romance titles.
pub(super) fn mixed_catalog(fantasy: usize, romance: usize) -> Vec<BookRecord> {
    let fantasy_books = (0..fantasy).map(|i| {
        BookRecord::new(format!("F{i}"), format!("Fantasy {i}"))
            .with_author(format!("Author F{i}"))
            .with_genre("Fantasy")
    });
    let romance_books = (0..romance).map(|i| {
        BookRecord::new(format!("R{i}"), format!("Romance {i}"))
            .with_author(format!("Author R{i}"))
            .with_genre("Romance")
    });
    fantasy_books.chain(romance_books).collect()
}

/// A saved fantasy book outside [`mixed_catalog`].
pub(super) fn saved_fantasy() -> InteractionRecord {
    InteractionRecord::new("LIB-1")
        .with_title("Library Fantasy")
        .with_genre("Fantasy")
        .mark_saved()
}
