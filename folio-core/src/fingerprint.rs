//! Change detection for a user's library.
//!
//! A [`LibraryFingerprint`] condenses the engagement state of every
//! interaction into one string. Two equal fingerprints mean the library has
//! not changed in any way that affects recommendations, so cached results can
//! be reused.
//!
//! Each record contributes a token of the form
//! `<isbn>:<saved><favorite>:r<rating>:<review>` where the flags are `s`, `f`
//! and `v` (or `-` when unset) and the rating is the qualifying rating with
//! one decimal place (or `-`). A rating that one decimal place does not
//! represent exactly also carries its full value after a `~`, so `4.41` and
//! `4.44` stay distinct. Tokens are sorted before joining so the order of the
//! underlying collection is irrelevant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InteractionRecord;

/// Fingerprint of an empty library.
pub const EMPTY_FINGERPRINT: &str = "empty";

const TOKEN_DELIMITER: &str = ",";

/// Order-independent digest of a user's interactions.
///
/// # Examples
/// ```
/// use folio_core::{InteractionRecord, LibraryFingerprint};
///
/// let a = InteractionRecord::new("A").mark_favorite();
/// let b = InteractionRecord::new("B").with_rating(4.0);
///
/// let forward = LibraryFingerprint::of(&[a.clone(), b.clone()]);
/// let reversed = LibraryFingerprint::of(&[b, a]);
/// assert_eq!(forward, reversed);
/// assert_eq!(forward.as_str(), "A:-f:r-:-,B:--:r4.0:-");
///
/// assert!(LibraryFingerprint::of(&[]).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryFingerprint(String);

impl LibraryFingerprint {
    /// Compute the fingerprint of `interactions`.
    #[must_use]
    pub fn of(interactions: &[InteractionRecord]) -> Self {
        if interactions.is_empty() {
            return Self::empty();
        }
        let mut tokens: Vec<String> = interactions.iter().map(token).collect();
        tokens.sort_unstable();
        Self(tokens.join(TOKEN_DELIMITER))
    }

    /// The sentinel fingerprint of an empty library.
    #[must_use]
    pub fn empty() -> Self {
        Self(EMPTY_FINGERPRINT.to_owned())
    }

    /// Report whether this is the empty-library sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == EMPTY_FINGERPRINT
    }

    /// Borrow the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn token(record: &InteractionRecord) -> String {
    let saved = if record.saved { 's' } else { '-' };
    let favorite = if record.favorite { 'f' } else { '-' };
    let rating = record
        .qualifying_rating()
        .map_or_else(|| "-".to_owned(), rating_token);
    let review = if record.has_review() { 'v' } else { '-' };
    format!("{}:{saved}{favorite}:r{rating}:{review}", record.isbn)
}

fn rating_token(value: f32) -> String {
    let rounded = format!("{value:.1}");
    let exact = rounded
        .parse::<f32>()
        .is_ok_and(|parsed| parsed.to_bits() == value.to_bits());
    if exact {
        rounded
    } else {
        format!("{rounded}~{value}")
    }
}
