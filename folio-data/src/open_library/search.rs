//! Open Library search response types and their mapping to book records.
//!
//! See: <https://openlibrary.org/dev/docs/api/search>

use folio_core::BookRecord;
use serde::Deserialize;
use serde_json::Value;

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const FALLBACK_GENRE: &str = "Fiction";
const SPECIFIC_GENRE_MAX_CHARS: usize = 30;
const COVERS_URL: &str = "https://covers.openlibrary.org/b";

/// Body of a `search.json` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Matching documents in relevance order.
    pub docs: Vec<SearchDoc>,
}

/// One search hit, restricted to the requested fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchDoc {
    /// Work title.
    pub title: Option<String>,
    /// Author names, primary author first.
    pub author_name: Option<Vec<String>>,
    /// Year of first publication.
    pub first_publish_year: Option<i32>,
    /// ISBN-10 and ISBN-13 values of all editions.
    pub isbn: Option<Vec<String>>,
    /// Cover image identifier.
    pub cover_i: Option<u64>,
    /// Subject headings.
    pub subject: Option<Vec<String>>,
    /// Work key such as `/works/OL27448W`.
    pub key: Option<String>,
    /// Edition keys.
    pub edition_key: Option<Vec<String>>,
}

impl SearchDoc {
    /// Map the hit to a book record.
    ///
    /// Returns `None` for hits without a title, hits with neither an author
    /// nor an ISBN, and hits with no usable identifier.
    #[must_use]
    pub fn into_book(self) -> Option<BookRecord> {
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        let authors = self.author_name.unwrap_or_default();
        let isbns = self.isbn.unwrap_or_default();
        if authors.is_empty() && isbns.is_empty() {
            return None;
        }

        let raw_isbn = preferred_isbn(&isbns);
        let work_id = self
            .key
            .as_deref()
            .map(|key| key.trim_start_matches("/works/"))
            .filter(|id| !id.is_empty());
        let id = raw_isbn
            .map(format_isbn)
            .or_else(|| work_id.map(|id| format!("OL{id}")))?;

        let author = authors
            .into_iter()
            .next()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned());
        let subjects = self.subject.unwrap_or_default();
        let mut book = BookRecord::new(id, title)
            .with_author(author)
            .with_genre(primary_genre(&subjects));
        if !subjects.is_empty() {
            book = book.with_genres(subjects);
        }

        if let Some(image) = cover_url(self.cover_i, raw_isbn) {
            book = book.with_extra("image", Value::String(image));
        }
        if let Some(year) = self.first_publish_year {
            book = book.with_extra("releaseDate", Value::String(format!("{year}-01-01")));
        }
        if let Some(key) = self.key {
            book = book.with_extra("olKey", Value::String(key));
        }
        if let Some(edition) = self.edition_key.and_then(|keys| keys.into_iter().next()) {
            book = book.with_extra("olEditionKey", Value::String(edition));
        }
        Some(book)
    }
}

fn preferred_isbn(isbns: &[String]) -> Option<&str> {
    isbns
        .iter()
        .find(|isbn| isbn.chars().count() == 13)
        .or_else(|| isbns.first())
        .map(String::as_str)
        .filter(|isbn| !isbn.is_empty())
}

fn primary_genre(subjects: &[String]) -> String {
    subjects
        .iter()
        .find(|subject| {
            !subject.is_empty() && subject.chars().count() < SPECIFIC_GENRE_MAX_CHARS
        })
        .or_else(|| subjects.first())
        .filter(|subject| !subject.is_empty())
        .map_or_else(|| FALLBACK_GENRE.to_owned(), Clone::clone)
}

fn cover_url(cover_id: Option<u64>, isbn: Option<&str>) -> Option<String> {
    match (cover_id, isbn) {
        (Some(id), _) => Some(format!("{COVERS_URL}/id/{id}-L.jpg")),
        (None, Some(isbn)) => Some(format!("{COVERS_URL}/isbn/{}-L.jpg", isbn.replace('-', ""))),
        (None, None) => None,
    }
}

fn hyphenate(digits: &str, groups: &[usize]) -> String {
    let mut chars = digits.chars();
    groups
        .iter()
        .map(|&len| chars.by_ref().take(len).collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Format an ISBN with display hyphens.
///
/// ISBN-13 values become `XXX-XX-XXXXX-XX-X` and ISBN-10 values
/// `X-XXXXX-XXX-X`; any other input is returned unchanged.
///
/// # Examples
/// ```
/// use folio_data::open_library::format_isbn;
///
/// assert_eq!(format_isbn("9780441013593"), "978-04-41013-59-3");
/// assert_eq!(format_isbn("0441013597"), "0-44101-359-7");
/// assert_eq!(format_isbn("12345"), "12345");
/// ```
#[must_use]
pub fn format_isbn(isbn: &str) -> String {
    let digits = isbn.replace('-', "");
    match digits.chars().count() {
        13 => hyphenate(&digits, &[3, 2, 5, 2, 1]),
        10 => hyphenate(&digits, &[1, 5, 3, 1]),
        _ => isbn.to_owned(),
    }
}
