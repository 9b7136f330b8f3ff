//! Core data model: embedding vectors, the bias direction, and the
//! projection-score table row.

pub mod geometry;
pub mod pca;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use pca::Pca;

/// One embedding vector. Owned by the store; mutated in place by the
/// debias operations.
pub type Vector = Array1<f32>;

/// Words meant to be rendered symmetric around the bias direction after
/// equalization (e.g. `{boy, girl}`). Almost always a pair.
pub type EqualitySet = SmallVec<[String; 2]>;

/// An identified bias axis: a unit-norm direction plus the word pair
/// naming its orientation.
///
/// Created once by [`identify_direction`](crate::identify_direction) and
/// read-only afterward. The sign is calibrated so that the difference
/// `vector(positive_end) − vector(negative_end)` points along the
/// positive direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasDirection {
    direction: Vector,
    positive_end: String,
    negative_end: String,
}

impl BiasDirection {
    pub(crate) fn new(
        direction: Vector,
        positive_end: impl Into<String>,
        negative_end: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            positive_end: positive_end.into(),
            negative_end: negative_end.into(),
        }
    }

    /// The unit-norm direction vector.
    pub fn direction(&self) -> &Vector {
        &self.direction
    }

    /// Word labelling the positive end of the axis (e.g. `"he"`).
    pub fn positive_end(&self) -> &str {
        &self.positive_end
    }

    /// Word labelling the negative end of the axis (e.g. `"she"`).
    pub fn negative_end(&self) -> &str {
        &self.negative_end
    }
}

/// One row of the projection-score table: a word and its projection
/// scalar on the bias direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionScore {
    pub word: String,
    pub projection: f32,
}
