//! # Principal Component Analysis
//!
//! Minimal PCA used by the direction estimator: fit on a small matrix of
//! pair-deviation rows, expose unit-norm components and explained-variance
//! ratios.
//!
//! The eigenproblem is solved with cyclic Jacobi rotations on the smaller
//! of the two symmetric forms:
//!
//! - rows ≤ cols: the Gram matrix `X Xᵀ` (rows × rows). Its nonzero
//!   eigenvalues equal those of the covariance, and covariance
//!   eigenvectors are recovered as `Xᵀ u` renormalized.
//! - rows > cols: the covariance `Xᵀ X` (cols × cols) directly.
//!
//! Direction estimation feeds 2N pair rows for N definitional pairs, so
//! the Gram path keeps the problem tiny regardless of embedding dimension.

use ndarray::{Array1, Array2, Axis};

/// Convergence threshold on the off-diagonal Frobenius norm.
const JACOBI_TOL: f32 = 1e-9;

/// Jacobi sweeps are quadratically convergent; this bound is generous.
const JACOBI_MAX_SWEEPS: usize = 64;

/// Eigenvalues below this fraction of total variance are treated as rank
/// deficiency and produce zero components.
const RANK_EPSILON: f32 = 1e-9;

/// A fitted PCA decomposition.
#[derive(Debug, Clone)]
pub struct Pca {
    components: Array2<f32>,
    explained_variance_ratio: Vec<f32>,
}

impl Pca {
    /// Fit on `matrix` (one observation per row), keeping at most
    /// `n_components` components. The effective count is clamped to
    /// `min(rows, cols)`.
    pub fn fit(matrix: &Array2<f32>, n_components: usize) -> Self {
        let rows = matrix.nrows();
        let cols = matrix.ncols();
        let k = n_components.min(rows).min(cols);

        // Center columns. Pair-deviation rows already sum to zero, but
        // the decomposition must not depend on that.
        let mean = matrix
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));
        let centered = matrix - &mean.view().insert_axis(Axis(0));

        let (eigenvalues, components) = if rows <= cols {
            Self::fit_gram(&centered, k)
        } else {
            Self::fit_covariance(&centered, k)
        };

        let total: f32 = eigenvalues.iter().filter(|&&v| v > 0.0).sum();
        let explained_variance_ratio = if total > f32::EPSILON {
            eigenvalues
                .iter()
                .take(k)
                .map(|&v| (v / total).max(0.0))
                .collect()
        } else {
            vec![0.0; k]
        };

        Self {
            components,
            explained_variance_ratio,
        }
    }

    /// Gram-matrix path: eigendecompose `X Xᵀ` (rows × rows), then map
    /// eigenvectors back into feature space.
    fn fit_gram(centered: &Array2<f32>, k: usize) -> (Vec<f32>, Array2<f32>) {
        let gram = centered.dot(&centered.t());
        let (eigenvalues, eigenvectors) = jacobi_eigh(&gram);

        let total: f32 = eigenvalues.iter().filter(|&&v| v > 0.0).sum();
        let mut components = Array2::zeros((k, centered.ncols()));
        for i in 0..k {
            if eigenvalues[i] <= RANK_EPSILON * total.max(f32::EPSILON) {
                continue;
            }
            let u = eigenvectors.column(i);
            let w = centered.t().dot(&u);
            let n = w.dot(&w).sqrt();
            if n > f32::EPSILON {
                components.row_mut(i).assign(&(&w / n));
            }
        }
        (eigenvalues, components)
    }

    /// Covariance path: eigendecompose `Xᵀ X` (cols × cols); eigenvectors
    /// are the components directly.
    fn fit_covariance(centered: &Array2<f32>, k: usize) -> (Vec<f32>, Array2<f32>) {
        let cov = centered.t().dot(centered);
        let (eigenvalues, eigenvectors) = jacobi_eigh(&cov);

        let mut components = Array2::zeros((k, centered.ncols()));
        for i in 0..k {
            components.row_mut(i).assign(&eigenvectors.column(i));
        }
        (eigenvalues, components)
    }

    /// Principal components, one unit-norm row each, strongest first.
    pub fn components(&self) -> &Array2<f32> {
        &self.components
    }

    /// Fraction of total variance captured by each kept component,
    /// descending. Sums to ≤ 1.
    pub fn explained_variance_ratio(&self) -> &[f32] {
        &self.explained_variance_ratio
    }
}

// ============================================================================
// Symmetric eigendecomposition
// ============================================================================

/// Cyclic Jacobi eigendecomposition of a symmetric matrix.
///
/// Returns eigenvalues in descending order and the matching eigenvectors
/// as columns.
fn jacobi_eigh(matrix: &Array2<f32>) -> (Vec<f32>, Array2<f32>) {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v: Array2<f32> = Array2::eye(n);

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off = 0.0f32;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off.sqrt() < JACOBI_TOL {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < JACOBI_TOL {
                    continue;
                }

                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // Rotate columns p and q of A, then rows p and q. The
                // two passes keep A symmetric.
                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));

    let eigenvalues: Vec<f32> = order.iter().map(|&i| a[[i, i]]).collect();
    let mut eigenvectors = Array2::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        eigenvectors.column_mut(dst).assign(&v.column(src));
    }

    (eigenvalues, eigenvectors)
}

// ============================================================================
// Tests
// ============================================================================
