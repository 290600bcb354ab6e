//! Error types raised while configuring the similarity scorer.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised by [`SimilarityWeights::validate`](crate::SimilarityWeights::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    /// A weight was NaN or infinite.
    #[error("weight `{name}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A weight was below zero.
    #[error("weight `{name}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
}
