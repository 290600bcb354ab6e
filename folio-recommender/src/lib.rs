//! Recommendation generation for Folio.
//!
//! The crate layers three pieces over the core types:
//!
//! - [`TieredBatchSelector`] cuts a score-sorted list into three relevance
//!   tiers, shuffles each one and assembles a bounded batch.
//! - [`RecommendationEngine`] excludes books the user already touched, scores
//!   the rest, drops zero scores and hands the ranking to the selector.
//! - [`RecommendationService`] gates the engine on the library fingerprint
//!   and keeps the per-user cache current.
//!
//! Randomness is always injected so callers can seed it.

#![forbid(unsafe_code)]

mod engine;
mod selector;
mod service;

pub use engine::{DEFAULT_BATCH_SIZE, RecommendationEngine};
pub use selector::{TierPlan, TieredBatchSelector};
pub use service::{RecommendationService, Refresh};
