//! # Specific-Word Learning
//!
//! Expands a small seed set of bias-specific words (e.g. explicitly
//! gendered words) into a vocabulary-wide set, by training a linear
//! max-margin classifier on the seed labels and predicting over every
//! word in the store.
//!
//! The classifier is a plain linear SVM trained with Pegasos-style
//! stochastic subgradient descent on the hinge loss, with "balanced"
//! class weighting to compensate for the capped non-specific sample.
//! Everything is seeded and deterministic.

use hashbrown::HashSet;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::geometry::normalize;
use crate::model::Vector;
use crate::storage::VectorStore;
use crate::{Error, Result};

/// Cap on non-specific training examples, taken in vocabulary
/// enumeration order.
pub const MAX_NON_SPECIFIC_EXAMPLES: usize = 1000;

/// Seed for every shuffle in this module. Training is reproducible.
pub const RANDOM_STATE: u64 = 42;

/// Regularization constant of the margin classifier.
const SVM_C: f32 = 1.0;

/// Full passes over the training set. The problem is tiny (≤ a few
/// thousand rows), so generous epochs cost little.
const SVM_EPOCHS: usize = 200;

/// A linear max-margin classifier: sign of `w·x + b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    weights: Vector,
    intercept: f32,
}

impl LinearSvc {
    /// Train on `features` (one observation per row) against boolean
    /// `labels`, using hinge loss with L2 regularization
    /// (`λ = 1/(C·n)`) and per-class balanced weights `n/(2·n_class)`.
    ///
    /// Pegasos schedule: learning rate `1/(λ·t)`, regularization shrink
    /// every step, margin-violation updates scaled by the class weight.
    pub fn fit(features: &Array2<f32>, labels: &[bool], c: f32, seed: u64) -> Self {
        let n = features.nrows();
        let positives = labels.iter().filter(|&&label| label).count();
        let negatives = n - positives;

        let weight_pos = if positives > 0 {
            n as f32 / (2.0 * positives as f32)
        } else {
            0.0
        };
        let weight_neg = if negatives > 0 {
            n as f32 / (2.0 * negatives as f32)
        } else {
            0.0
        };

        let lambda = 1.0 / (c * n as f32);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut weights: Vector = Array1::zeros(features.ncols());
        let mut intercept = 0.0f32;
        let mut order: Vec<usize> = (0..n).collect();
        let mut step = 0usize;

        for _ in 0..SVM_EPOCHS {
            order.shuffle(&mut rng);
            for &i in &order {
                step += 1;
                let eta = 1.0 / (lambda * step as f32);
                let row = features.row(i);
                let y = if labels[i] { 1.0 } else { -1.0 };
                let class_weight = if labels[i] { weight_pos } else { weight_neg };

                let margin = y * (weights.dot(&row) + intercept);
                weights *= 1.0 - eta * lambda;
                if margin < 1.0 {
                    weights.scaled_add(eta * class_weight * y, &row);
                    // The bias is unregularized; harmonic steps keep it
                    // bounded without a shrink term.
                    intercept += class_weight * y / step as f32;
                }
            }
        }

        Self { weights, intercept }
    }

    /// Signed distance to the separating hyperplane.
    pub fn decision_function(&self, vector: &ArrayView1<f32>) -> f32 {
        self.weights.dot(vector) + self.intercept
    }

    /// Whether `vector` falls on the positive (specific) side.
    pub fn predict(&self, vector: &ArrayView1<f32>) -> bool {
        self.decision_function(vector) > 0.0
    }
}

/// Output of [`learn_full_specific_words`].
#[derive(Debug, Clone)]
pub struct LearnedSpecificWords {
    /// Every vocabulary word the classifier predicts as specific.
    pub words: Vec<String>,
    /// The trained classifier, for reuse on other vocabularies.
    pub classifier: LinearSvc,
    /// Training feature matrix; populated only in debug mode.
    pub features: Option<Array2<f32>>,
    /// Training labels; populated only in debug mode.
    pub labels: Option<Vec<bool>>,
}

/// Learn the full specific-word set from seed examples.
///
/// The training set is every in-vocabulary seed word (label = true) plus
/// the first `max_non_specific_examples` other words in vocabulary
/// enumeration order (label = false) — capped, not sampled. Rows are
/// shuffled deterministically and normalized to unit length before
/// training; prediction runs over the entire vocabulary on normalized
/// vectors.
///
/// With `debug = true` the raw feature matrix and label vector are
/// returned alongside for inspection.
pub fn learn_full_specific_words<S: VectorStore>(
    store: &S,
    seed_specific_words: &[String],
    max_non_specific_examples: usize,
    debug: bool,
) -> Result<LearnedSpecificWords> {
    let seeds: HashSet<&str> = seed_specific_words.iter().map(String::as_str).collect();

    let mut data: Vec<(Vector, bool)> = Vec::new();
    let mut non_specific_count = 0usize;
    for word in store.words() {
        if seeds.contains(word) {
            data.push((store.get(word)?.clone(), true));
        } else {
            non_specific_count += 1;
            if non_specific_count <= max_non_specific_examples {
                data.push((store.get(word)?.clone(), false));
            }
        }
    }
    if data.is_empty() {
        return Err(Error::EmptyWordList("training example"));
    }

    let mut rng = StdRng::seed_from_u64(RANDOM_STATE);
    data.shuffle(&mut rng);

    let mut features = Array2::zeros((data.len(), store.dimension()));
    let mut labels = Vec::with_capacity(data.len());
    for (i, (vector, label)) in data.iter().enumerate() {
        features.row_mut(i).assign(&normalize(vector));
        labels.push(*label);
    }

    info!(
        examples = data.len(),
        positives = labels.iter().filter(|&&l| l).count(),
        "training specific-word classifier"
    );
    let classifier = LinearSvc::fit(&features, &labels, SVM_C, RANDOM_STATE);

    let mut full_specific_words = Vec::new();
    for word in store.words() {
        let vector = normalize(store.get(word)?);
        if classifier.predict(&vector.view()) {
            full_specific_words.push(word.to_string());
        }
    }
    info!(learned = full_specific_words.len(), "specific words predicted");

    Ok(LearnedSpecificWords {
        words: full_specific_words,
        classifier,
        features: debug.then_some(features),
        labels: debug.then_some(labels),
    })
}

// ============================================================================
// Tests
// ============================================================================
