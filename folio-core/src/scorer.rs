//! Score candidate books against a user's library.
//!
//! The `Scorer` trait assigns a relevance score and a list of reasons to a
//! [`BookRecord`](crate::BookRecord) given the user's
//! [`InteractionRecord`](crate::InteractionRecord) history.

use crate::{BookRecord, InteractionRecord, Similarity};

/// Calculate the similarity between a candidate and a user's history.
///
/// Higher scores indicate a closer match. Implementations must be
/// thread-safe (`Send` + `Sync`) so one scorer can serve several users.
/// The method is infallible; implementers must return a zero score when no
/// information is available, including for an empty history.
///
/// Implementations must:
/// - Produce finite (`f32::is_finite`) scores.
/// - Return non-negative values.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use folio_core::{BookRecord, InteractionRecord, Scorer, Similarity};
///
/// struct FlatScorer;
///
/// impl Scorer for FlatScorer {
///     fn score(&self, history: &[InteractionRecord], _candidate: &BookRecord) -> Similarity {
///         if history.is_empty() {
///             return Similarity::none();
///         }
///         Similarity { score: 1.0, reasons: Vec::new() }
///     }
/// }
///
/// let candidate = BookRecord::new("1", "Dune");
/// assert_eq!(FlatScorer.score(&[], &candidate).score, 0.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return the similarity of `candidate` to `history`.
    fn score(&self, history: &[InteractionRecord], candidate: &BookRecord) -> Similarity;

    /// Validate a raw score.
    ///
    /// Returns `0.0` for non-finite and negative values.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.max(0.0)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&self, history: &[InteractionRecord], candidate: &BookRecord) -> Similarity {
        (**self).score(history, candidate)
    }
}
