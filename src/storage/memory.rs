//! In-memory vector store.
//!
//! This is the reference implementation of `VectorStore`. Vectors live in
//! a plain `Vec` with an insertion-ordered vocabulary and a hashed
//! word → slot index.
//!
//! ## Limitations
//!
//! - **No persistence**: loading/saving an embedding format belongs to
//!   external stores, not here.
//! - **Single-writer**: no interior locking. In-place debias runs take
//!   `&mut self`; concurrent readers of the same store are the caller's
//!   bug, per the trait contract.
//!
//! Use this store for:
//! - Testing the direction, measurement, and debias pipeline
//! - Embedding the audit in applications that already hold vectors in
//!   memory

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::VectorStore;
use crate::model::geometry::norm;
use crate::model::Vector;
use crate::{Error, Result};

/// In-memory embedding storage with a stable, insertion-ordered
/// vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    dimension: usize,
    /// Vocabulary in insertion order. `words()` enumerates this.
    order: Vec<String>,
    /// word → slot in `order` / `vectors`.
    index: HashMap<String, usize>,
    vectors: Vec<Vector>,
}

impl MemoryStore {
    /// Create an empty store for vectors of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            order: Vec::new(),
            index: HashMap::new(),
            vectors: Vec::new(),
        }
    }

    /// Insert a word, or replace its vector if already present (the slot
    /// keeps its original position in the enumeration order).
    pub fn insert(&mut self, word: impl Into<String>, vector: impl Into<Vector>) -> Result<()> {
        let word = word.into();
        let vector = vector.into();
        if vector.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }

        match self.index.get(&word) {
            Some(&slot) => self.vectors[slot] = vector,
            None => {
                let slot = self.order.len();
                self.order.push(word.clone());
                self.index.insert(word, slot);
                self.vectors.push(vector);
            }
        }
        Ok(())
    }

    /// Build a store from `(word, vector)` entries.
    pub fn from_entries<W, V>(dimension: usize, entries: impl IntoIterator<Item = (W, V)>) -> Result<Self>
    where
        W: Into<String>,
        V: Into<Vector>,
    {
        let mut store = Self::new(dimension);
        for (word, vector) in entries {
            store.insert(word, vector)?;
        }
        Ok(store)
    }
}

impl VectorStore for MemoryStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    fn get(&self, word: &str) -> Result<&Vector> {
        self.index
            .get(word)
            .map(|&slot| &self.vectors[slot])
            .ok_or_else(|| Error::WordNotFound(word.to_string()))
    }

    fn words(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.order.iter().map(String::as_str))
    }

    fn update(&mut self, word: &str, vector: Vector) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        let slot = *self
            .index
            .get(word)
            .ok_or_else(|| Error::WordNotFound(word.to_string()))?;
        self.vectors[slot] = vector;
        Ok(())
    }

    fn renormalize(&mut self) {
        for vector in &mut self.vectors {
            let n = norm(vector);
            if n > f32::EPSILON {
                *vector /= n;
            }
        }
    }

    fn duplicate(&self) -> Self {
        self.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
