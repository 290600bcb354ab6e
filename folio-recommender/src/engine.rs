//! Scoring and selection over a full catalog snapshot.

use std::collections::HashSet;

use folio_core::{BookRecord, InteractionRecord, ScoredBook, Scorer};
use folio_scorer::SimilarityScorer;
use log::debug;
use rand::Rng;

use crate::TieredBatchSelector;

/// Batch size used when callers do not ask for one.
pub const DEFAULT_BATCH_SIZE: usize = 300;

/// Turns a library and a catalog into a recommendation batch.
///
/// The engine is pure apart from the injected random source: it performs no
/// I/O and keeps no state between calls.
///
/// # Examples
/// ```
/// use folio_core::{BookRecord, InteractionRecord};
/// use folio_recommender::RecommendationEngine;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let engine: RecommendationEngine = RecommendationEngine::default();
/// let library = [InteractionRecord::new("A").mark_favorite().with_genre("fantasy")];
/// let catalog = [
///     BookRecord::new("B", "The Hobbit").with_genre("fantasy"),
///     BookRecord::new("C", "Emma").with_genre("romance"),
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let batch = engine.generate(&library, &catalog, 10, &mut rng);
/// assert_eq!(batch.len(), 1);
/// assert_eq!(batch[0].isbn(), "B");
/// assert_eq!(batch[0].score, 3.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine<S = SimilarityScorer> {
    scorer: S,
    selector: TieredBatchSelector,
}

impl<S: Scorer> RecommendationEngine<S> {
    /// Build an engine around `scorer`.
    pub const fn new(scorer: S) -> Self {
        Self {
            scorer,
            selector: TieredBatchSelector,
        }
    }

    /// Borrow the scorer.
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Score every candidate the user has not touched, best first.
    ///
    /// Candidates scoring zero are dropped. Equal scores keep catalog order.
    pub fn rank(&self, interactions: &[InteractionRecord], candidates: &[BookRecord]) -> Vec<ScoredBook> {
        let touched: HashSet<&str> = interactions
            .iter()
            .map(|record| record.isbn.as_str())
            .collect();
        let mut scored: Vec<ScoredBook> = candidates
            .iter()
            .filter(|book| !touched.contains(book.isbn.as_str()))
            .filter_map(|book| {
                let similarity = self.scorer.score(interactions, book);
                similarity
                    .is_match()
                    .then(|| ScoredBook::new(book.clone(), similarity))
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(
            "{} of {} candidates matched {} interactions",
            scored.len(),
            candidates.len(),
            interactions.len()
        );
        scored
    }

    /// Produce up to `batch_size` recommendations.
    ///
    /// Returns an empty batch when the catalog is empty, when no interaction
    /// is relevant, or when nothing scores above zero.
    pub fn generate<R>(
        &self,
        interactions: &[InteractionRecord],
        candidates: &[BookRecord],
        batch_size: usize,
        rng: &mut R,
    ) -> Vec<ScoredBook>
    where
        R: Rng + ?Sized,
    {
        if candidates.is_empty() {
            debug!("no catalog books available for recommendations");
            return Vec::new();
        }
        if !interactions.iter().any(InteractionRecord::is_relevant) {
            debug!("library has no relevant interactions");
            return Vec::new();
        }
        let ranked = self.rank(interactions, candidates);
        if ranked.is_empty() {
            return ranked;
        }
        self.selector.select(ranked, batch_size, rng)
    }
}
