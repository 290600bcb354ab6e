//! Filesystem access for Folio built on `cap-std` and `camino`.
//!
//! Provides UTF-8 path helpers for reading fixture files and
//! [`DirStore`], a [`KeyValueStore`](folio_core::KeyValueStore) keeping one
//! JSON file per key inside a directory.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};

mod dir_store;

pub use dir_store::DirStore;

/// Read a whole UTF-8 text file.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Open the directory holding `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should end in a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Report whether `path` exists and is a regular file.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Open `path` as a capability directory, creating it and any missing
/// ancestors first.
pub fn open_or_create_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    fs_utf8::Dir::create_ambient_dir_all(path, ambient_authority())?;
    fs_utf8::Dir::open_ambient_dir(path, ambient_authority())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir")
    }

    #[rstest]
    fn open_or_create_dir_creates_nested_directories() {
        let temp = TempDir::new().expect("temp dir");
        let nested = utf8(&temp).join("a/b/c");
        open_or_create_dir(&nested).expect("create nested");
        assert!(nested.is_dir());
        open_or_create_dir(&nested).expect("existing dir is fine");
    }

    #[rstest]
    fn reads_utf8_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = utf8(&temp).join("books.json");
        std::fs::write(&path, "[]").expect("write fixture");
        assert_eq!(read_utf8_file(&path).expect("read"), "[]");
    }

    #[rstest]
    fn file_is_file_distinguishes_directories() {
        let temp = TempDir::new().expect("temp dir");
        let root = utf8(&temp);
        let file = root.join("library.json");
        std::fs::write(&file, "[]").expect("write fixture");
        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&root).expect("inspect directory"));
        let missing = file_is_file(&root.join("absent.json")).expect_err("missing file");
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn missing_file_reports_not_found() {
        let temp = TempDir::new().expect("temp dir");
        let err = read_utf8_file(&utf8(&temp).join("absent.json")).expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
