//! Tiered, shuffled batch selection.
//!
//! Candidates arrive sorted by descending score and are cut into three
//! contiguous tiers of `len / 3` items, the last tier absorbing any
//! remainder. Each tier is shuffled independently, then up to
//! `batch_size / 3` items are taken from the first two tiers and the rest of
//! the batch from the third. A short tier is never backfilled from another.

use folio_core::ScoredBook;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

/// Number of relevance tiers.
const TIERS: usize = 3;

/// Picks a bounded, varied batch from score-sorted candidates.
///
/// # Examples
/// ```
/// use folio_core::{BookRecord, ScoredBook, Similarity};
/// use folio_recommender::TieredBatchSelector;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let sorted: Vec<ScoredBook> = (0..9)
///     .map(|i| ScoredBook::new(BookRecord::new(i.to_string(), "t"), Similarity::none()))
///     .collect();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let batch = TieredBatchSelector.select(sorted, 6, &mut rng);
/// assert_eq!(batch.len(), 6);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TieredBatchSelector;

/// Tier boundaries for a sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPlan {
    /// Items per full tier (`len / 3`).
    pub chunk: usize,
    /// Items requested from each of the first two tiers (`batch_size / 3`).
    pub per_tier: usize,
}

impl TierPlan {
    /// Compute the plan for `total` candidates and a batch of `batch_size`.
    #[expect(
        clippy::integer_division,
        reason = "tier sizes are defined by floor division"
    )]
    #[must_use]
    pub const fn new(total: usize, batch_size: usize) -> Self {
        Self {
            chunk: total / TIERS,
            per_tier: batch_size / TIERS,
        }
    }
}

impl TieredBatchSelector {
    /// Select at most `batch_size` books from `sorted`.
    ///
    /// `sorted` must be ordered by descending score. The output lists the
    /// first tier's picks, then the second's, then the third's.
    pub fn select<R>(&self, sorted: Vec<ScoredBook>, batch_size: usize, rng: &mut R) -> Vec<ScoredBook>
    where
        R: Rng + ?Sized,
    {
        let plan = TierPlan::new(sorted.len(), batch_size);
        let mut head = sorted;
        let mut tier3 = head.split_off(plan.chunk.saturating_mul(2).min(head.len()));
        let mut tier2 = head.split_off(plan.chunk.min(head.len()));
        let mut tier1 = head;

        tier1.shuffle(rng);
        tier2.shuffle(rng);
        tier3.shuffle(rng);

        tier1.truncate(plan.per_tier);
        tier2.truncate(plan.per_tier);
        let remaining = batch_size
            .saturating_sub(tier1.len())
            .saturating_sub(tier2.len());
        tier3.truncate(remaining);

        debug!(
            "selected {}+{}+{} of {batch_size} requested (tier size {})",
            tier1.len(),
            tier2.len(),
            tier3.len(),
            plan.chunk
        );

        let mut batch = tier1;
        batch.append(&mut tier2);
        batch.append(&mut tier3);
        batch
    }
}
