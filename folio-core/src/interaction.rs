//! Library interactions: what the user did with a book.
//!
//! An [`InteractionRecord`] carries the book's descriptive fields alongside
//! the engagement flags. Only records with at least one qualifying signal are
//! relevant to scoring; see [`InteractionRecord::engagement`].

use serde::{Deserialize, Serialize};

/// One book the user has touched, keyed by `isbn`.
///
/// # Examples
/// ```
/// use folio_core::{Engagement, InteractionRecord};
///
/// let record = InteractionRecord::new("978-0")
///     .with_genre("Fantasy")
///     .with_rating(4.0);
/// assert_eq!(record.engagement(), Some(Engagement::Rated(4.0)));
///
/// let untouched = InteractionRecord::new("978-1");
/// assert!(!untouched.is_relevant());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Identifier of the book the interaction refers to.
    pub isbn: String,
    /// Title of the book, used in author reasons.
    #[serde(default)]
    pub title: String,
    /// Author of the book, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Primary genre of the book, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Multi-genre list of the book, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// The user bookmarked the book.
    #[serde(default)]
    pub saved: bool,
    /// The user favourited the book.
    #[serde(default)]
    pub favorite: bool,
    /// The user supplied a rating.
    #[serde(default)]
    pub rated: bool,
    /// Rating in `0.0..=5.0`; meaningful only when `rated` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// The user wrote a review.
    #[serde(default)]
    pub reviewed: bool,
    /// Free-text review; meaningful only when `reviewed` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Strongest engagement signal of a relevant interaction.
///
/// Variants are listed in precedence order: a record reports the first one it
/// qualifies for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Engagement {
    /// A non-blank review was written.
    Reviewed,
    /// A positive rating was given.
    Rated(f32),
    /// The book was favourited.
    Favorited,
    /// The book was only saved.
    Saved,
}

impl InteractionRecord {
    /// Construct a record with no engagement for `isbn`.
    pub fn new(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    /// Set the title while returning `self` for chaining.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
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

    /// Mark the book as saved.
    #[must_use]
    pub fn mark_saved(mut self) -> Self {
        self.saved = true;
        self
    }

    /// Mark the book as a favourite.
    #[must_use]
    pub fn mark_favorite(mut self) -> Self {
        self.favorite = true;
        self
    }

    /// Record a rating and set the `rated` flag.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rated = true;
        self.rating = Some(rating);
        self
    }

    /// Record a review and set the `reviewed` flag.
    #[must_use]
    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.reviewed = true;
        self.review = Some(review.into());
        self
    }

    /// Return the rating when it counts as a signal.
    ///
    /// The `rated` flag must be set and the rating must be finite and
    /// strictly positive.
    #[must_use]
    pub fn qualifying_rating(&self) -> Option<f32> {
        self.rating
            .filter(|rating| self.rated && rating.is_finite() && *rating > 0.0)
    }

    /// Report whether the review counts as a signal.
    #[must_use]
    pub fn has_review(&self) -> bool {
        self.reviewed
            && self
                .review
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }

    /// Classify the strongest engagement, or `None` for irrelevant records.
    #[must_use]
    pub fn engagement(&self) -> Option<Engagement> {
        if self.has_review() {
            return Some(Engagement::Reviewed);
        }
        if let Some(rating) = self.qualifying_rating() {
            return Some(Engagement::Rated(rating));
        }
        if self.favorite {
            return Some(Engagement::Favorited);
        }
        self.saved.then_some(Engagement::Saved)
    }

    /// Report whether the record may contribute to scoring.
    #[must_use]
    pub fn is_relevant(&self) -> bool {
        self.engagement().is_some()
    }
}
