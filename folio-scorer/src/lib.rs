//! Content-based similarity scoring for Folio.
//!
//! [`SimilarityScorer`] implements the [`Scorer`](folio_core::Scorer) trait by
//! comparing a candidate book against every relevant interaction in the
//! user's library. Each interaction contributes according to how strongly the
//! user engaged with it (review, rating, favourite, saved) and how the
//! candidate overlaps with it:
//!
//! - a shared primary genre adds `genre_match × multiplier`,
//! - a shared author adds `author_match × multiplier`,
//! - each entry the two `genres` sets share, compared exactly, adds
//!   `shared_genre × multiplier`.
//!
//! Contributions accumulate across interactions. Reasons are deduplicated
//! per genre and per author.
//!
//! # Examples
//!
//! ```
//! use folio_core::{BookRecord, InteractionRecord, Scorer};
//! use folio_scorer::SimilarityScorer;
//!
//! let history = [InteractionRecord::new("A").mark_favorite().with_genre("fantasy")];
//! let candidate = BookRecord::new("B", "The Hobbit").with_genre("Fantasy");
//!
//! let similarity = SimilarityScorer::default().score(&history, &candidate);
//! assert_eq!(similarity.score, 3.0);
//! assert_eq!(similarity.reasons[0].message, "Similar to your Fantasy books");
//! ```

#![forbid(unsafe_code)]

mod error;
mod similarity;
mod weights;

pub use error::WeightsError;
pub use similarity::SimilarityScorer;
pub use weights::SimilarityWeights;
