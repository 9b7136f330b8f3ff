//! # debias-rs — Word-Embedding Bias Audit and Mitigation
//!
//! Audits and mitigates linear bias directions (e.g. gender) in a
//! pretrained word-embedding space, and learns a classifier that expands
//! a small set of bias-specific seed words into a vocabulary-wide set.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `VectorStore` is the contract between the audit
//!    algorithms and any embedding storage
//! 2. **Directions are values**: a `BiasDirection` is a small immutable
//!    record passed explicitly into measurement and debias functions
//! 3. **Explicit ownership**: copy-debiasing duplicates the store; no
//!    hidden aliasing
//! 4. **Seeded everywhere**: every stochastic step is deterministic
//!
//! ## Quick Start
//!
//! ```rust
//! use debias_rs::{BiasAudit, DirectionMethod, MemoryStore};
//!
//! # fn main() -> debias_rs::Result<()> {
//! let store = MemoryStore::from_entries(3, [
//!     ("he", vec![0.9, 0.1, 0.0]),
//!     ("she", vec![-0.9, 0.1, 0.0]),
//!     ("doctor", vec![0.1, 0.9, 0.3]),
//! ])?;
//!
//! let definitional = vec![("he".to_string(), "she".to_string())];
//! let mut audit = BiasAudit::new(store);
//! audit.identify("he", "she", &definitional, DirectionMethod::Single)?;
//!
//! let score = audit.project("doctor")?;
//! assert!(score.abs() <= 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Identify | `direction` | definitional pairs → unit bias direction |
//! | Measure | `measure` | projections, direct/indirect bias |
//! | Debias | `debias` | neutralize / equalize / soft, in place or on a copy |
//! | Learn | `learn` | seed words → vocabulary-wide specific set |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod direction;
pub mod measure;
pub mod debias;
pub mod learn;
pub mod words;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{BiasDirection, EqualitySet, Pca, ProjectionScore, Vector};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{MemoryStore, VectorStore};

// ============================================================================
// Re-exports: Operations
// ============================================================================

pub use direction::{identify_direction, DirectionMethod, FIRST_PC_THRESHOLD, PCA_COMPONENTS};

pub use debias::{
    debias_to_copy, equalize, extract_neutral_words, neutralize, soft_neutralize, DebiasMethod,
    DEFAULT_SOFT_STRENGTH,
};

pub use learn::{
    learn_full_specific_words, LearnedSpecificWords, LinearSvc, MAX_NON_SPECIFIC_EXAMPLES,
    RANDOM_STATE,
};

// ============================================================================
// Top-level audit handle
// ============================================================================

/// Convenience handle pairing a store with an identified direction.
///
/// The free functions (and `BiasDirection` methods) cover every
/// operation with explicit arguments; this handle wraps them for the
/// common one-direction workflow: identify once, then measure and
/// debias against the same store.
pub struct BiasAudit<S: VectorStore> {
    store: S,
    direction: Option<BiasDirection>,
}

impl<S: VectorStore> BiasAudit<S> {
    /// Wrap a store. No direction is identified yet.
    pub fn new(store: S) -> Self {
        Self {
            store,
            direction: None,
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the handle, keeping the (possibly debiased) store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The identified direction, if any.
    pub fn direction(&self) -> Option<&BiasDirection> {
        self.direction.as_ref()
    }

    fn identified(&self) -> Result<&BiasDirection> {
        self.direction.as_ref().ok_or(Error::DirectionNotIdentified)
    }

    /// Identify the bias direction and keep it on the handle.
    pub fn identify(
        &mut self,
        positive_end: &str,
        negative_end: &str,
        definitional: &[(String, String)],
        method: DirectionMethod,
    ) -> Result<()> {
        self.direction = Some(identify_direction(
            &self.store,
            positive_end,
            negative_end,
            definitional,
            method,
        )?);
        Ok(())
    }

    /// Projection scalar of `word` on the identified direction.
    pub fn project(&self, word: &str) -> Result<f32> {
        self.identified()?.project(&self.store, word)
    }

    /// Sorted projection table for `words`.
    pub fn projection_scores(&self, words: &[String]) -> Result<Vec<ProjectionScore>> {
        self.identified()?.projection_scores(&self.store, words)
    }

    /// Direct bias over the neutral words with strictness `c`.
    pub fn direct_bias(&self, neutral_words: &[String], c: f32) -> Result<f32> {
        self.identified()?.direct_bias(&self.store, neutral_words, c)
    }

    /// Indirect (pair) bias between two words.
    pub fn indirect_bias(&self, word1: &str, word2: &str) -> Result<f32> {
        self.identified()?.indirect_bias(&self.store, word1, word2)
    }

    /// Debias the wrapped store in place. Renormalizes every vector.
    pub fn debias(
        &mut self,
        method: DebiasMethod,
        neutral_words: &[String],
        equality_sets: &[EqualitySet],
    ) -> Result<()> {
        let direction = self.identified()?.clone();
        debias::debias(
            &mut self.store,
            &direction,
            method,
            neutral_words,
            equality_sets,
        )
    }

    /// Debias a duplicate of the wrapped store, leaving it untouched.
    pub fn debias_to_copy(
        &self,
        method: DebiasMethod,
        neutral_words: &[String],
        equality_sets: &[EqualitySet],
    ) -> Result<S> {
        debias_to_copy(
            &self.store,
            self.identified()?,
            method,
            neutral_words,
            equality_sets,
        )
    }

    /// Default neutral-word set: vocabulary minus case variants of the
    /// specific words.
    pub fn extract_neutral_words(&self, specific_words: &[String]) -> Vec<String> {
        extract_neutral_words(&self.store, specific_words)
    }

    /// Expand seed specific words over the whole vocabulary.
    pub fn learn_full_specific_words(
        &self,
        seed_specific_words: &[String],
        max_non_specific_examples: usize,
        debug: bool,
    ) -> Result<LearnedSpecificWords> {
        learn_full_specific_words(
            &self.store,
            seed_specific_words,
            max_non_specific_examples,
            debug,
        )
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("word not in vocabulary: {0:?}")]
    WordNotFound(String),

    #[error("direction method should be one of [single, sum, pca], {0:?} was given")]
    UnknownDirectionMethod(String),

    #[error("debias method should be one of [neutralize, hard, soft], {0:?} was given")]
    UnknownDebiasMethod(String),

    #[error("positive_end and negative_end should be different, both are {0:?}")]
    IdenticalEnds(String),

    #[error("the bias direction was not identified; call identify() first")]
    DirectionNotIdentified,

    #[error(
        "first principal component explains {ratio} of the variance, expected at least {threshold}"
    )]
    WeakPrincipalComponent { ratio: f32, threshold: f32 },

    #[error("similarity between {word1:?} and {word2:?} is too close to zero for indirect bias")]
    DegenerateSimilarity { word1: String, word2: String },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("empty {0} list")]
    EmptyWordList(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed word list: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
