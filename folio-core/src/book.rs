//! Catalog book records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A book offered by the catalog.
///
/// Records are supplied by a [`CatalogProvider`](crate::CatalogProvider) and
/// are never mutated by the engine. Fields the engine does not interpret
/// (cover image, page count, publisher, …) are kept in [`BookRecord::extra`]
/// so recommended entries remain displayable.
///
/// # Examples
/// ```
/// use folio_core::BookRecord;
///
/// let book = BookRecord::new("978-0", "Dune")
///     .with_author("Frank Herbert")
///     .with_genre("Science Fiction");
/// assert_eq!(book.genre.as_deref(), Some("Science Fiction"));
/// assert!(book.genres.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookRecord {
    /// Identifier unique within the catalog; the join key across the engine.
    pub isbn: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Display author, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Primary genre, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Secondary multi-genre signal, independent of `genre`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Catalog fields carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookRecord {
    /// Construct a record with an identifier and title.
    pub fn new(isbn: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the author while returning `self` for chaining.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the primary genre while returning `self` for chaining.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set the multi-genre list while returning `self` for chaining.
    #[must_use]
    pub fn with_genres<I, G>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<String>,
    {
        self.genres = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    /// Attach an opaque catalog field while returning `self` for chaining.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Normalise a display string into the key used for matching.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Absent
/// and blank values yield `None` so that two missing values never match.
///
/// # Examples
/// ```
/// use folio_core::match_key;
///
/// assert_eq!(match_key(Some("  Fantasy ")), Some("fantasy".to_owned()));
/// assert_eq!(match_key(Some("   ")), None);
/// assert_eq!(match_key(None), None);
/// ```
#[must_use]
pub fn match_key(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
