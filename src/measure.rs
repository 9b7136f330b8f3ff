//! # Bias Measurement
//!
//! Read-only scoring of words against an identified [`BiasDirection`]:
//! per-word projection scalars, the sorted projection table, aggregate
//! direct bias over neutral words, and pairwise indirect bias.
//!
//! Every operation takes the store explicitly — a direction is a value,
//! not a session. None of these mutate the store.

use tracing::debug;

use crate::model::geometry::{cosine_similarity, normalize, reject_vector};
use crate::model::{BiasDirection, ProjectionScore};
use crate::storage::VectorStore;
use crate::{Error, Result};

/// Below this raw inner product, the indirect-bias quotient divides by
/// noise and the measure is undefined.
const SIMILARITY_EPSILON: f32 = 1e-6;

impl BiasDirection {
    /// Projection scalar of `word` on the direction: cosine similarity
    /// of the word's vector with the direction. The vector is not
    /// pre-normalized; cosine is norm-invariant.
    pub fn project<S: VectorStore>(&self, store: &S, word: &str) -> Result<f32> {
        Ok(cosine_similarity(store.get(word)?, self.direction()))
    }

    /// Projection table for `words`, sorted by projection descending.
    ///
    /// The sorted contract is load-bearing: external reporting layers
    /// consume this ordering as-is.
    pub fn projection_scores<S: VectorStore>(
        &self,
        store: &S,
        words: &[String],
    ) -> Result<Vec<ProjectionScore>> {
        let mut scores = Vec::with_capacity(words.len());
        for word in words {
            scores.push(ProjectionScore {
                word: word.clone(),
                projection: self.project(store, word)?,
            });
        }
        scores.sort_by(|a, b| b.projection.total_cmp(&a.projection));
        Ok(scores)
    }

    /// Direct bias: `mean(|projection(w)|^c)` over the neutral words.
    ///
    /// `c` controls strictness — `c → 0` counts any nonzero bias
    /// equally, `c = 1` is linear, `c > 2` punishes large bias harder.
    /// An empty word list is rejected rather than dividing by zero.
    pub fn direct_bias<S: VectorStore>(
        &self,
        store: &S,
        neutral_words: &[String],
        c: f32,
    ) -> Result<f32> {
        if neutral_words.is_empty() {
            return Err(Error::EmptyWordList("neutral word"));
        }

        let mut total = 0.0f32;
        for word in neutral_words {
            total += self.project(store, word)?.abs().powf(c);
        }
        let bias = total / neutral_words.len() as f32;
        debug!(
            words = neutral_words.len(),
            c = c as f64,
            bias = bias as f64,
            "direct bias"
        );
        Ok(bias)
    }

    /// Indirect (pair) bias: the fraction of the two words' raw
    /// similarity attributable to the bias direction.
    ///
    /// Both vectors are normalized, then stripped of their direction
    /// component; the measure compares the full inner product with the
    /// similarity of the stripped parts:
    /// `(⟨v1,v2⟩ − cos(reject(v1), reject(v2))) / ⟨v1,v2⟩`.
    ///
    /// When the raw inner product is within `1e-6` of zero the quotient
    /// is undefined and [`Error::DegenerateSimilarity`] is returned.
    pub fn indirect_bias<S: VectorStore>(
        &self,
        store: &S,
        word1: &str,
        word2: &str,
    ) -> Result<f32> {
        let vector1 = normalize(store.get(word1)?);
        let vector2 = normalize(store.get(word2)?);

        let inner = vector1.dot(&vector2);
        if inner.abs() < SIMILARITY_EPSILON {
            return Err(Error::DegenerateSimilarity {
                word1: word1.to_string(),
                word2: word2.to_string(),
            });
        }

        let perpendicular1 = reject_vector(&vector1, self.direction());
        let perpendicular2 = reject_vector(&vector2, self.direction());
        let perpendicular_similarity = cosine_similarity(&perpendicular1, &perpendicular2);

        Ok((inner - perpendicular_similarity) / inner)
    }
}

// ============================================================================
// Tests
// ============================================================================
