//! Scoring output: similarity scores, reasons, and scored books.

use serde::{Deserialize, Serialize};

use crate::BookRecord;

const REVIEWED_NOTE: &str = " (reviewed)";

/// Signal that produced a [`Reason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonKind {
    /// The candidate shares a genre with the user's library.
    Genre,
    /// The candidate shares an author with the user's library.
    Author,
}

/// Human-readable explanation attached to a recommendation.
///
/// # Examples
/// ```
/// use folio_core::{Reason, ReasonKind};
///
/// let reason = Reason::genre("Fantasy", true);
/// assert_eq!(reason.kind, ReasonKind::Genre);
/// assert_eq!(reason.message, "Similar to your Fantasy books (reviewed)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Signal category.
    #[serde(rename = "type")]
    pub kind: ReasonKind,
    /// Matched value in display case.
    pub value: String,
    /// Sentence shown to the user.
    pub message: String,
}

impl Reason {
    /// Build a genre reason; `reviewed` appends the reviewed note.
    pub fn genre(genre: impl Into<String>, reviewed: bool) -> Self {
        let value = genre.into();
        let note = if reviewed { REVIEWED_NOTE } else { "" };
        let message = format!("Similar to your {value} books{note}");
        Self {
            kind: ReasonKind::Genre,
            value,
            message,
        }
    }

    /// Build an author reason referencing the title of the matching book.
    pub fn author(author: impl Into<String>, matched_title: &str, reviewed: bool) -> Self {
        let note = if reviewed { REVIEWED_NOTE } else { "" };
        Self {
            kind: ReasonKind::Author,
            value: author.into(),
            message: format!("Same author as \"{matched_title}\"{note}"),
        }
    }
}

/// Relevance of one candidate against a user's history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Similarity {
    /// Non-negative accumulated score.
    pub score: f32,
    /// Deduplicated reasons in discovery order.
    pub reasons: Vec<Reason>,
}

impl Similarity {
    /// A zero score with no reasons.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            score: 0.0,
            reasons: Vec::new(),
        }
    }

    /// Report whether the candidate is worth recommending.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// A catalog book augmented with its similarity score.
///
/// Serialises flat: the book's fields sit next to `score` and
/// `recommendationReasons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBook {
    /// The recommended book.
    #[serde(flatten)]
    pub book: BookRecord,
    /// Similarity score.
    pub score: f32,
    /// Reasons explaining the score.
    #[serde(rename = "recommendationReasons", default)]
    pub reasons: Vec<Reason>,
}

impl ScoredBook {
    /// Attach a similarity to a book.
    #[must_use]
    pub fn new(book: BookRecord, similarity: Similarity) -> Self {
        Self {
            book,
            score: similarity.score,
            reasons: similarity.reasons,
        }
    }

    /// Identifier of the underlying book.
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.book.isbn
    }
}
