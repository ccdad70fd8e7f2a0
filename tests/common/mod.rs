//! Common test utilities
#![allow(dead_code)]

use factr::matrix::DenseMatrix;

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two matrices are close within tolerance
pub fn assert_matrix_close(a: &DenseMatrix, b: &DenseMatrix, tol: f64, msg: &str) {
    assert_eq!(a.rows(), b.rows(), "{}: row count mismatch", msg);
    assert_eq!(a.cols(), b.cols(), "{}: column count mismatch", msg);
    assert_allclose_f64(a.as_slice(), b.as_slice(), 0.0, tol, msg);
}

/// Deterministic pseudo-random value in [-1, 1), reproducible across runs
pub fn pseudo_random(seed: usize) -> f64 {
    ((seed * 2654435761 + 104729) % 2000) as f64 / 1000.0 - 1.0
}

/// A deterministic m x n test matrix with entries in [-1, 1)
pub fn pseudo_random_matrix(m: usize, n: usize, seed: usize) -> DenseMatrix {
    let data: Vec<f64> = (0..m * n).map(|i| pseudo_random(seed + i)).collect();
    DenseMatrix::from_vec(data, m, n).unwrap()
}

/// A deterministic, diagonally dominant (hence well-conditioned) n x n
/// matrix
pub fn dominant_matrix(n: usize, seed: usize) -> DenseMatrix {
    let mut a = pseudo_random_matrix(n, n, seed);
    for i in 0..n {
        a.set(i, i, a.get(i, i) + n as f64 + 1.0);
    }
    a
}

/// A deterministic symmetric positive-definite n x n matrix
///
/// Built as B^T B + n*I, which is positive definite for any B.
pub fn spd_matrix(n: usize, seed: usize) -> DenseMatrix {
    let b = pseudo_random_matrix(n, n, seed);
    let mut a = b.transpose().matmul(&b).unwrap();
    for i in 0..n {
        a.set(i, i, a.get(i, i) + n as f64);
    }
    a
}
