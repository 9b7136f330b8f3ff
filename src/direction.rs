//! # Bias-Direction Estimation
//!
//! Turns a set of definitional word pairs (e.g. `(he, she)`, `(man,
//! woman)`) into a single unit-norm [`BiasDirection`].
//!
//! Three estimation methods, selected by [`DirectionMethod`]:
//!
//! | Method | Procedure |
//! |--------|-----------|
//! | `Single` | difference of the first pair's normalized vectors |
//! | `Sum` | difference of the normalized per-group sums |
//! | `Pca` | first principal component of pair-centroid deviations |
//!
//! Whatever the method, the sign is calibrated afterward so the
//! `positive_end − negative_end` difference projects non-negatively on
//! the direction.

use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::geometry::{cosine_similarity, normalize};
use crate::model::{BiasDirection, Pca};
use crate::storage::VectorStore;
use crate::{Error, Result};

/// Minimum explained-variance ratio the first principal component must
/// reach for `Pca` estimation to be accepted. Below it, the
/// pair-difference structure is not dominated by one axis and the input
/// pairs are a bad definitional set.
pub const FIRST_PC_THRESHOLD: f32 = 0.5;

/// Number of principal components fitted by the `Pca` method.
pub const PCA_COMPONENTS: usize = 10;

/// How to estimate the direction from the definitional pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionMethod {
    /// Difference of the first pair only.
    Single,
    /// Difference of the summed word groups.
    Sum,
    /// First principal component of the centered pair differences.
    Pca,
}

impl DirectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Sum => "sum",
            Self::Pca => "pca",
        }
    }
}

impl FromStr for DirectionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Self::Single),
            "sum" => Ok(Self::Sum),
            "pca" => Ok(Self::Pca),
            other => Err(Error::UnknownDirectionMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for DirectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimate a bias direction from definitional word pairs.
///
/// `positive_end` / `negative_end` name the axis orientation (e.g.
/// `"he"` / `"she"`); both must be in the store. Fails before any
/// computation when the ends are identical or `definitional` is empty.
///
/// The `Pca` method additionally fails with
/// [`Error::WeakPrincipalComponent`] when the first component's
/// explained-variance ratio falls below [`FIRST_PC_THRESHOLD`].
pub fn identify_direction<S: VectorStore>(
    store: &S,
    positive_end: &str,
    negative_end: &str,
    definitional: &[(String, String)],
    method: DirectionMethod,
) -> Result<BiasDirection> {
    if positive_end == negative_end {
        return Err(Error::IdenticalEnds(positive_end.to_string()));
    }
    if definitional.is_empty() {
        return Err(Error::EmptyWordList("definitional pair"));
    }

    debug!(%method, positive_end, negative_end, "identifying bias direction");

    let direction = match method {
        DirectionMethod::Single => {
            let (word1, word2) = &definitional[0];
            let diff = normalize(store.get(word1)?) - normalize(store.get(word2)?);
            normalize(&diff)
        }

        DirectionMethod::Sum => {
            let mut group1: Array1<f32> = Array1::zeros(store.dimension());
            let mut group2: Array1<f32> = Array1::zeros(store.dimension());
            for (word1, word2) in definitional {
                group1 += store.get(word1)?;
                group2 += store.get(word2)?;
            }
            let diff = normalize(&group1) - normalize(&group2);
            normalize(&diff)
        }

        DirectionMethod::Pca => identify_by_pca(store, definitional)?,
    };

    // The estimator cannot control which way PCA (or an inverted pair
    // ordering) points; flip so positive_end projects positively.
    let ends_diff = store.get(positive_end)? - store.get(negative_end)?;
    let direction = if cosine_similarity(&ends_diff, &direction) < 0.0 {
        -direction
    } else {
        direction
    };

    Ok(BiasDirection::new(direction, positive_end, negative_end))
}

/// PCA estimation: for each pair, normalize both vectors and append
/// their deviations from the pair centroid; the first principal
/// component of the stacked 2N×D matrix is the direction candidate.
fn identify_by_pca<S: VectorStore>(
    store: &S,
    definitional: &[(String, String)],
) -> Result<Array1<f32>> {
    let dim = store.dimension();
    let mut matrix = Array2::<f32>::zeros((2 * definitional.len(), dim));

    for (i, (word1, word2)) in definitional.iter().enumerate() {
        let vector1 = normalize(store.get(word1)?);
        let vector2 = normalize(store.get(word2)?);
        let center = (&vector1 + &vector2) / 2.0;
        matrix.row_mut(2 * i).assign(&(&vector1 - &center));
        matrix.row_mut(2 * i + 1).assign(&(&vector2 - &center));
    }

    let pca = Pca::fit(&matrix, PCA_COMPONENTS);
    for (component, ratio) in pca.explained_variance_ratio().iter().enumerate() {
        debug!(component = component + 1, ratio = *ratio as f64, "explained variance");
    }

    let first = pca.explained_variance_ratio()[0];
    if first < FIRST_PC_THRESHOLD {
        return Err(Error::WeakPrincipalComponent {
            ratio: first,
            threshold: FIRST_PC_THRESHOLD,
        });
    }

    Ok(pca.components().row(0).to_owned())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::norm;
    use crate::storage::MemoryStore;

    const TOL: f32 = 1e-5;

    fn gendered_store() -> MemoryStore {
        MemoryStore::from_entries(
            3,
            [
                ("he", vec![0.9f32, 0.1, 0.05]),
                ("she", vec![-0.85, 0.12, 0.05]),
                ("man", vec![0.8, 0.2, -0.1]),
                ("woman", vec![-0.75, 0.22, -0.1]),
                ("doctor", vec![0.05, 0.9, 0.3]),
            ],
        )
        .unwrap()
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn identical_ends_rejected_for_every_method() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "she")]);
        for method in [
            DirectionMethod::Single,
            DirectionMethod::Sum,
            DirectionMethod::Pca,
        ] {
            let err =
                identify_direction(&store, "he", "he", &definitional, method).unwrap_err();
            assert!(matches!(err, Error::IdenticalEnds(_)), "{method} accepted");
        }
    }

    #[test]
    fn empty_definitional_pairs_rejected() {
        let store = gendered_store();
        let err =
            identify_direction(&store, "he", "she", &[], DirectionMethod::Sum).unwrap_err();
        assert!(matches!(err, Error::EmptyWordList(_)));
    }

    #[test]
    fn method_parses_from_valid_names_only() {
        assert_eq!(
            "single".parse::<DirectionMethod>().unwrap(),
            DirectionMethod::Single
        );
        assert_eq!(
            "sum".parse::<DirectionMethod>().unwrap(),
            DirectionMethod::Sum
        );
        assert_eq!(
            "pca".parse::<DirectionMethod>().unwrap(),
            DirectionMethod::Pca
        );
        assert!(matches!(
            "svd".parse::<DirectionMethod>(),
            Err(Error::UnknownDirectionMethod(m)) if m == "svd"
        ));
    }

    #[test]
    fn single_direction_is_unit_and_sign_calibrated() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "she")]);
        let axis =
            identify_direction(&store, "he", "she", &definitional, DirectionMethod::Single)
                .unwrap();

        assert!((norm(axis.direction()) - 1.0).abs() < TOL);
        assert_eq!(axis.positive_end(), "he");
        assert_eq!(axis.negative_end(), "she");

        let ends_diff = store.get("he").unwrap() - store.get("she").unwrap();
        assert!(cosine_similarity(&ends_diff, axis.direction()) >= 0.0);
    }

    #[test]
    fn sum_direction_aligns_with_dominant_axis() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "she"), ("man", "woman")]);
        let axis =
            identify_direction(&store, "he", "she", &definitional, DirectionMethod::Sum)
                .unwrap();

        assert!((norm(axis.direction()) - 1.0).abs() < TOL);
        // The gendered words differ along the first coordinate.
        assert!(axis.direction()[0] > 0.9);
    }

    #[test]
    fn sign_flips_when_ends_are_swapped() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "she"), ("man", "woman")]);
        let forward =
            identify_direction(&store, "he", "she", &definitional, DirectionMethod::Sum)
                .unwrap();
        let reverse =
            identify_direction(&store, "she", "he", &definitional, DirectionMethod::Sum)
                .unwrap();

        let dot = forward.direction().dot(reverse.direction());
        assert!((dot + 1.0).abs() < TOL, "directions should be opposite, dot {dot}");
    }

    #[test]
    fn pca_direction_recovers_dominant_pair_axis() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "she"), ("man", "woman")]);
        let axis =
            identify_direction(&store, "he", "she", &definitional, DirectionMethod::Pca)
                .unwrap();

        assert!((norm(axis.direction()) - 1.0).abs() < TOL);
        assert!(axis.direction()[0] > 0.9, "direction {:?}", axis.direction());
    }

    #[test]
    fn pca_rejects_weak_first_component() {
        // Three pairs differing along three orthogonal axes: no single
        // component can explain half the variance.
        let store = MemoryStore::from_entries(
            4,
            [
                ("a1", vec![1.0f32, 0.0, 0.0, 0.1]),
                ("a2", vec![-1.0, 0.0, 0.0, 0.1]),
                ("b1", vec![0.0, 1.0, 0.0, 0.1]),
                ("b2", vec![0.0, -1.0, 0.0, 0.1]),
                ("c1", vec![0.0, 0.0, 1.0, 0.1]),
                ("c2", vec![0.0, 0.0, -1.0, 0.1]),
            ],
        )
        .unwrap();
        let definitional = pairs(&[("a1", "a2"), ("b1", "b2"), ("c1", "c2")]);

        let err = identify_direction(&store, "a1", "a2", &definitional, DirectionMethod::Pca)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::WeakPrincipalComponent { ratio, threshold }
                if ratio < threshold && threshold == FIRST_PC_THRESHOLD
        ));
    }

    #[test]
    fn unknown_definitional_word_surfaces_store_error() {
        let store = gendered_store();
        let definitional = pairs(&[("he", "her")]);
        let err =
            identify_direction(&store, "he", "she", &definitional, DirectionMethod::Single)
                .unwrap_err();
        assert!(matches!(err, Error::WordNotFound(w) if w == "her"));
    }
}
