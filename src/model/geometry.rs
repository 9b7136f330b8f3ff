//! # Vector Geometry — Projection and Rejection Primitives
//!
//! Pure vector math over the embedding space. Everything downstream
//! (direction estimation, bias measurement, neutralize/equalize) is
//! built from these five operations:
//!
//! | Operation | Meaning |
//! |-----------|---------|
//! | `normalize` | scale to unit length |
//! | `cosine_similarity` | angle-based similarity, norm-invariant |
//! | `project_vector` | component of `v` along a unit direction |
//! | `reject_vector` | component of `v` orthogonal to a direction |
//! | `project_reject_vector` | both parts from one dot product |
//!
//! All operations are pure, allocate only their result, and run in
//! O(dimension).

use super::Vector;

/// Euclidean norm of `v`.
#[inline]
pub fn norm(v: &Vector) -> f32 {
    v.dot(v).sqrt()
}

/// Scale `v` to unit length.
///
/// A zero vector has no defined direction: the result then contains
/// non-finite components. Callers that may hold zero vectors must guard
/// with [`norm`] first.
#[inline]
pub fn normalize(v: &Vector) -> Vector {
    v / norm(v)
}

/// Cosine similarity `(a·b)/(‖a‖‖b‖)`, in `[-1, 1]` for finite input.
///
/// Norm-invariant: callers may pass raw or normalized vectors.
#[inline]
pub fn cosine_similarity(a: &Vector, b: &Vector) -> f32 {
    a.dot(b) / (norm(a) * norm(b))
}

/// Component of `v` along `direction`: `(v·d) d`.
///
/// `direction` must be unit norm; the caller owns that invariant.
#[inline]
pub fn project_vector(v: &Vector, direction: &Vector) -> Vector {
    direction * v.dot(direction)
}

/// Component of `v` orthogonal to `direction`: `v − (v·d) d`.
#[inline]
pub fn reject_vector(v: &Vector, direction: &Vector) -> Vector {
    v - &project_vector(v, direction)
}

/// Both the projected and rejected parts of `v`, computed from a single
/// dot product.
#[inline]
pub fn project_reject_vector(v: &Vector, direction: &Vector) -> (Vector, Vector) {
    let projected = direction * v.dot(direction);
    let rejected = v - &projected;
    (projected, rejected)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOL: f32 = 1e-5;

    #[test]
    fn normalize_yields_unit_length() {
        let v = array![3.0, 4.0];
        let n = normalize(&v);
        assert!((norm(&n) - 1.0).abs() < TOL);
        assert!((n[0] - 0.6).abs() < TOL);
        assert!((n[1] - 0.8).abs() < TOL);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = array![0.2, -0.7, 1.3];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < TOL);
    }

    #[test]
    fn cosine_is_norm_invariant() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![-2.0, 0.5, 1.0];
        let scaled = &a * 7.5;
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&scaled, &b)).abs() < TOL);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 5.0];
        assert!(cosine_similarity(&a, &b).abs() < TOL);
    }

    #[test]
    fn projection_onto_basis_axis_keeps_that_component() {
        let v = array![0.3, -0.4, 0.9];
        let d = array![0.0, 1.0, 0.0];
        let p = project_vector(&v, &d);
        assert!((p[0]).abs() < TOL);
        assert!((p[1] + 0.4).abs() < TOL);
        assert!((p[2]).abs() < TOL);
    }

    #[test]
    fn project_plus_reject_reassembles_the_vector() {
        let v = array![0.9, -1.2, 0.4, 2.0];
        let d = normalize(&array![1.0, 1.0, -1.0, 0.5]);
        let (projected, rejected) = project_reject_vector(&v, &d);
        let rebuilt = &projected + &rejected;
        for i in 0..v.len() {
            assert!((rebuilt[i] - v[i]).abs() < TOL);
        }
    }

    #[test]
    fn rejection_is_orthogonal_to_direction() {
        let v = array![0.9, -1.2, 0.4, 2.0];
        let d = normalize(&array![-0.3, 2.0, 0.7, 1.1]);
        let r = reject_vector(&v, &d);
        assert!(r.dot(&d).abs() < TOL);
    }

    #[test]
    fn combined_split_matches_individual_operations() {
        let v = array![1.5, -0.5, 0.25];
        let d = normalize(&array![0.2, 0.9, -0.4]);
        let (projected, rejected) = project_reject_vector(&v, &d);
        let p = project_vector(&v, &d);
        let r = reject_vector(&v, &d);
        for i in 0..v.len() {
            assert!((projected[i] - p[i]).abs() < TOL);
            assert!((rejected[i] - r[i]).abs() < TOL);
        }
    }
}
