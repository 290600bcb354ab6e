//! Weighted genre and author overlap between a candidate and a library.
#![forbid(unsafe_code)]

use std::collections::HashSet;

use folio_core::{
    BookRecord, Engagement, InteractionRecord, Reason, Scorer, Similarity, match_key,
};

use crate::{SimilarityWeights, WeightsError};

/// Scores candidates by genre and author overlap with relevant interactions.
///
/// Irrelevant interactions (no save, favourite, qualifying rating or
/// qualifying review) are skipped entirely. Absent or blank genres and
/// authors never match, including against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    /// Build a scorer with custom weights.
    ///
    /// # Errors
    /// Returns [`WeightsError`] when any weight is negative or not finite.
    pub fn new(weights: SimilarityWeights) -> Result<Self, WeightsError> {
        Ok(Self {
            weights: weights.validate()?,
        })
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }
}

/// Candidate fields normalised once per scoring pass.
struct CandidateKeys<'a> {
    genre: Option<(String, &'a str)>,
    author: Option<(String, &'a str)>,
    genres: Option<Vec<&'a str>>,
}

impl<'a> CandidateKeys<'a> {
    fn of(candidate: &'a BookRecord) -> Self {
        let keyed = |value: &'a Option<String>| {
            let display = value.as_deref()?;
            match_key(Some(display)).map(|key| (key, display))
        };
        Self {
            genre: keyed(&candidate.genre),
            author: keyed(&candidate.author),
            genres: candidate.genres.as_deref().map(distinct_genres),
        }
    }
}

/// Treat a genre list as a set: exact duplicates collapse, first occurrence
/// wins. Spelling and case are significant.
fn distinct_genres(values: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(String::as_str)
        .filter(|value| seen.insert(*value))
        .collect()
}

/// Key shared by every genre reason, whichever field produced it.
fn reason_key(genre: &str) -> String {
    genre.trim().to_lowercase()
}

#[derive(Default)]
struct Tally {
    score: f32,
    reasons: Vec<Reason>,
    seen_genres: HashSet<String>,
    seen_authors: HashSet<String>,
}

impl Tally {
    #[expect(
        clippy::float_arithmetic,
        reason = "similarity accumulates weighted contributions"
    )]
    fn add(&mut self, base: f32, multiplier: f32) {
        self.score += base * multiplier;
    }

    fn note_genre(&mut self, key: &str, display: &str, reviewed: bool) {
        if self.seen_genres.insert(key.to_owned()) {
            self.reasons.push(Reason::genre(display, reviewed));
        }
    }

    fn note_author(&mut self, key: &str, display: &str, title: &str, reviewed: bool) {
        if self.seen_authors.insert(key.to_owned()) {
            self.reasons.push(Reason::author(display, title, reviewed));
        }
    }
}

impl Scorer for SimilarityScorer {
    fn score(&self, history: &[InteractionRecord], candidate: &BookRecord) -> Similarity {
        if history.is_empty() {
            return Similarity::none();
        }
        let keys = CandidateKeys::of(candidate);
        let mut tally = Tally::default();

        for record in history {
            let Some(engagement) = record.engagement() else {
                continue;
            };
            let multiplier = self.weights.multiplier(engagement);
            let reviewed = matches!(engagement, Engagement::Reviewed);

            if let Some((key, display)) = &keys.genre {
                if match_key(record.genre.as_deref()).as_ref() == Some(key) {
                    tally.add(self.weights.genre_match, multiplier);
                    tally.note_genre(key, display, reviewed);
                }
            }

            if let Some((key, display)) = &keys.author {
                if match_key(record.author.as_deref()).as_ref() == Some(key) {
                    tally.add(self.weights.author_match, multiplier);
                    tally.note_author(key, display, &record.title, reviewed);
                }
            }

            if let (Some(candidate_genres), Some(record_genres)) =
                (&keys.genres, record.genres.as_deref())
            {
                let owned: HashSet<&str> = record_genres.iter().map(String::as_str).collect();
                for display in candidate_genres {
                    if owned.contains(display) {
                        tally.add(self.weights.shared_genre, multiplier);
                        tally.note_genre(&reason_key(display), display, reviewed);
                    }
                }
            }
        }

        Similarity {
            score: Self::sanitise(tally.score),
            reasons: tally.reasons,
        }
    }
}
