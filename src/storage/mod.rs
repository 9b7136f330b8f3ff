//! # Vector Store Trait
//!
//! This is THE contract between the bias-audit algorithms and any
//! embedding storage. The core never owns embedding serialization — a
//! store is an external collaborator that exposes lookup, vocabulary
//! enumeration, and per-word mutation.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory for testing/embedding |
//!
//! ## Ordering contract
//!
//! `words()` must enumerate the vocabulary in a stable, deterministic
//! order. Two operations depend on it: the specific-word learner caps its
//! non-specific examples by enumeration order, and the neutral-word
//! complement is produced in enumeration order.

pub mod memory;

use crate::model::Vector;
use crate::Result;

pub use memory::MemoryStore;

/// The universal embedding-store contract.
///
/// In-place mutation (`update`, `renormalize`) follows a single-writer
/// rule: callers must not read the store concurrently with a mutating
/// debias run. `duplicate` exists so callers can debias a fully owned
/// copy while the original stays readable.
pub trait VectorStore {
    /// Embedding dimensionality.
    fn dimension(&self) -> usize;

    /// Number of words in the vocabulary.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `word` is in the vocabulary.
    fn contains(&self, word: &str) -> bool;

    /// The vector for `word`, or [`Error::WordNotFound`](crate::Error).
    fn get(&self, word: &str) -> Result<&Vector>;

    /// Enumerate the vocabulary in the store's stable order.
    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Replace the vector of an existing word in place.
    fn update(&mut self, word: &str, vector: Vector) -> Result<()>;

    /// Renormalize every vector to unit length.
    fn renormalize(&mut self);

    /// A deep, fully independent copy with its own backing storage.
    fn duplicate(&self) -> Self
    where
        Self: Sized;

    /// Retain only the words present in the vocabulary, preserving input
    /// order. Convenience for callers that must pre-filter before
    /// projection or debias calls.
    fn filter_known(&self, words: &[String]) -> Vec<String> {
        words
            .iter()
            .filter(|word| self.contains(word))
            .cloned()
            .collect()
    }
}
