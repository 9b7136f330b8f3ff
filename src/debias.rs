//! # Debiasing — Neutralize and Equalize
//!
//! Mutating counterpart to the measurement module. Three procedures,
//! selected by [`DebiasMethod`]:
//!
//! | Method | Procedure |
//! |--------|-----------|
//! | `Neutralize` | strip the direction component from the neutral words |
//! | `Hard` | neutralize, then equalize the equality sets |
//! | `Soft { strength }` | partially strip the direction component |
//!
//! Every run ends by renormalizing the whole store to unit length. This
//! is a destructive, global side effect: after any debias call, no
//! consumer may assume the original norms survived.
//!
//! In-place runs take `&mut` on the store (single-writer rule).
//! [`debias_to_copy`] instead duplicates the store and returns a fully
//! owned, debiased copy, leaving the original untouched.

use std::str::FromStr;

use hashbrown::HashSet;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::geometry::{norm, normalize, project_reject_vector, project_vector, reject_vector};
use crate::model::{BiasDirection, EqualitySet};
use crate::storage::VectorStore;
use crate::{Error, Result};

/// Neutralize fraction used when `"soft"` is parsed without an explicit
/// strength.
pub const DEFAULT_SOFT_STRENGTH: f32 = 0.5;

/// Which debias procedure to run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebiasMethod {
    /// Strip the direction component from the neutral words.
    Neutralize,
    /// Neutralize, then equalize the equality sets.
    Hard,
    /// Partial neutralize: remove `strength` of the direction component
    /// (`1.0` coincides with `Neutralize`, `0.0` is the identity up to
    /// renormalization). No equalize step.
    Soft { strength: f32 },
}

impl FromStr for DebiasMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "neutralize" => Ok(Self::Neutralize),
            "hard" => Ok(Self::Hard),
            "soft" => Ok(Self::Soft {
                strength: DEFAULT_SOFT_STRENGTH,
            }),
            other => Err(Error::UnknownDebiasMethod(other.to_string())),
        }
    }
}

/// Replace each neutral word's vector with its rejection against the
/// direction, then renormalize the store.
pub fn neutralize<S: VectorStore>(
    store: &mut S,
    direction: &BiasDirection,
    neutral_words: &[String],
) -> Result<()> {
    debug!(words = neutral_words.len(), "neutralize");
    for word in neutral_words {
        let neutralized = reject_vector(store.get(word)?, direction.direction());
        store.update(word, neutralized)?;
    }
    store.renormalize();
    Ok(())
}

/// Partial neutralize: `v ← v − strength·(v·d)d` per neutral word, then
/// renormalize the store. `strength` is clamped to `[0, 1]`.
pub fn soft_neutralize<S: VectorStore>(
    store: &mut S,
    direction: &BiasDirection,
    neutral_words: &[String],
    strength: f32,
) -> Result<()> {
    let strength = strength.clamp(0.0, 1.0);
    debug!(
        words = neutral_words.len(),
        strength = strength as f64,
        "soft neutralize"
    );
    for word in neutral_words {
        let vector = store.get(word)?;
        let softened = vector - &(project_vector(vector, direction.direction()) * strength);
        store.update(word, softened)?;
    }
    store.renormalize();
    Ok(())
}

/// Force every member of each equality set to share one orthogonal
/// component while sitting at symmetric, equal-magnitude positions along
/// the direction; then renormalize the store.
///
/// Per set: normalize the members, take their centroid, split it into
/// projected and rejected parts, and rebuild each member as
/// `rejected_centroid + scaling · normalize(project(v) − projected_centroid)`
/// with `scaling = sqrt(max(0, 1 − ‖rejected_centroid‖²))`. The max
/// clamp guards against a negative radicand from rounding.
pub fn equalize<S: VectorStore>(
    store: &mut S,
    direction: &BiasDirection,
    equality_sets: &[EqualitySet],
) -> Result<()> {
    debug!(sets = equality_sets.len(), "equalize");
    let d = direction.direction();

    for set in equality_sets {
        let mut members = Vec::with_capacity(set.len());
        for word in set {
            members.push((word, normalize(store.get(word)?)));
        }

        let mut center: Array1<f32> = Array1::zeros(store.dimension());
        for (_, vector) in &members {
            center += vector;
        }
        center /= members.len() as f32;

        let (projected_center, rejected_center) = project_reject_vector(&center, d);
        let scaling = (1.0 - norm(&rejected_center).powi(2)).max(0.0).sqrt();

        for (word, vector) in &members {
            let projected = project_vector(vector, d);
            let projected_part = normalize(&(&projected - &projected_center));
            let equalized = &rejected_center + &(projected_part * scaling);
            store.update(word, equalized)?;
        }
    }
    store.renormalize();
    Ok(())
}

/// Run the selected debias procedure in place.
///
/// `Neutralize` and `Soft` consume only `neutral_words`; `Hard` runs
/// neutralize over `neutral_words` and then equalize over
/// `equality_sets`.
pub fn debias<S: VectorStore>(
    store: &mut S,
    direction: &BiasDirection,
    method: DebiasMethod,
    neutral_words: &[String],
    equality_sets: &[EqualitySet],
) -> Result<()> {
    match method {
        DebiasMethod::Neutralize => neutralize(store, direction, neutral_words),
        DebiasMethod::Hard => {
            neutralize(store, direction, neutral_words)?;
            equalize(store, direction, equality_sets)
        }
        DebiasMethod::Soft { strength } => {
            soft_neutralize(store, direction, neutral_words, strength)
        }
    }
}

/// Debias a duplicate of the store, returning the fully owned copy. The
/// original store is left byte-identical.
pub fn debias_to_copy<S: VectorStore>(
    store: &S,
    direction: &BiasDirection,
    method: DebiasMethod,
    neutral_words: &[String],
    equality_sets: &[EqualitySet],
) -> Result<S> {
    let mut copy = store.duplicate();
    debias(&mut copy, direction, method, neutral_words, equality_sets)?;
    Ok(copy)
}

/// Default neutral-word set: the full vocabulary minus every case
/// variant (as-is, lower, UPPER, Title) of each specific word, in
/// vocabulary enumeration order.
///
/// The case expansion exists because specific-word lists are routinely
/// trained on embeddings with different casing conventions.
pub fn extract_neutral_words<S: VectorStore>(store: &S, specific_words: &[String]) -> Vec<String> {
    let mut specific: HashSet<String> = HashSet::new();
    for word in specific_words {
        specific.insert(word.clone());
        specific.insert(word.to_lowercase());
        specific.insert(word.to_uppercase());
        specific.insert(title_case(word));
    }

    store
        .words()
        .filter(|word| !specific.contains(*word))
        .map(str::to_string)
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
