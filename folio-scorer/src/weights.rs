//! Tunable weights for similarity scoring.
#![forbid(unsafe_code)]

use folio_core::Engagement;
use serde::{Deserialize, Serialize};

use crate::WeightsError;

/// Base points and engagement multipliers used by
/// [`SimilarityScorer`](crate::SimilarityScorer).
///
/// The defaults reproduce the published scoring model: a review doubles an
/// interaction's weight, a rating maps linearly onto `0.3..=2.5`, a
/// favourite counts `1.5` and a plain save `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimilarityWeights {
    /// Points for a matching primary genre.
    pub genre_match: f32,
    /// Points for a matching author.
    pub author_match: f32,
    /// Points for each shared entry of the `genres` lists.
    pub shared_genre: f32,
    /// Multiplier for an interaction with a qualifying review.
    pub review: f32,
    /// Multiplier for a favourited interaction.
    pub favorite: f32,
    /// Multiplier for a saved-only interaction.
    pub saved: f32,
    /// Lowest multiplier a rating can produce.
    pub rating_floor: f32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            genre_match: 2.0_f32,
            author_match: 1.0_f32,
            shared_genre: 2.0_f32,
            review: 2.0_f32,
            favorite: 1.5_f32,
            saved: 1.0_f32,
            rating_floor: 0.3_f32,
        }
    }
}

impl SimilarityWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError`] naming the first field that is not finite or
    /// is negative.
    pub fn validate(self) -> Result<Self, WeightsError> {
        for (name, value) in self.fields() {
            if !value.is_finite() {
                return Err(WeightsError::NonFinite { name, value });
            }
            if value < 0.0_f32 {
                return Err(WeightsError::Negative { name, value });
            }
        }
        Ok(self)
    }

    const fn fields(self) -> [(&'static str, f32); 7] {
        [
            ("genreMatch", self.genre_match),
            ("authorMatch", self.author_match),
            ("sharedGenre", self.shared_genre),
            ("review", self.review),
            ("favorite", self.favorite),
            ("saved", self.saved),
            ("ratingFloor", self.rating_floor),
        ]
    }

    /// Multiplier applied to every contribution of an interaction.
    #[must_use]
    pub fn multiplier(&self, engagement: Engagement) -> f32 {
        match engagement {
            Engagement::Reviewed => self.review,
            Engagement::Rated(rating) => self.rating_multiplier(rating),
            Engagement::Favorited => self.favorite,
            Engagement::Saved => self.saved,
        }
    }

    /// Map a star rating onto a multiplier.
    ///
    /// Computes `(rating - 2) * 0.5 + 1`, so two stars yields `1.0` and five
    /// stars `2.5`. Results below `rating_floor` are raised to it.
    #[expect(
        clippy::float_arithmetic,
        reason = "rating multiplier is a linear map over the star value"
    )]
    #[must_use]
    pub fn rating_multiplier(&self, rating: f32) -> f32 {
        let linear = (rating - 2.0_f32) * 0.5_f32 + 1.0_f32;
        linear.max(self.rating_floor)
    }
}
