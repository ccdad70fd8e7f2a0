//! Integration tests for Householder QR decomposition
//!
//! Tests verify:
//! - Reconstruction Q*R = A and orthogonality Q^T*Q = I
//! - Least-squares solving for square and overdetermined systems
//! - Rank-deficiency detection and shape validation
//! - The compact Householder storage views

mod common;

use common::{assert_allclose_f64, assert_matrix_close, pseudo_random_matrix};
use factr::decomp::QrDecomposition;
use factr::error::Error;
use factr::matrix::{DenseMatrix, MajorOrder};

#[test]
fn reconstruction_q_times_r_equals_a() {
    for (m, n, seed) in [(3, 3, 5), (6, 4, 19), (8, 2, 37)] {
        let a = pseudo_random_matrix(m, n, seed);
        let qr = QrDecomposition::new(&a).unwrap();
        let product = qr.q().matmul(&qr.r()).unwrap();
        assert_matrix_close(&product, &a, 1e-12, "Q*R = A");
    }
}

#[test]
fn q_has_orthonormal_columns() {
    for (m, n, seed) in [(4, 4, 43), (7, 3, 67)] {
        let a = pseudo_random_matrix(m, n, seed);
        let qr = QrDecomposition::new(&a).unwrap();
        let q = qr.q();
        let qtq = q.transpose().matmul(&q).unwrap();
        let identity = DenseMatrix::identity(n).unwrap();
        assert_matrix_close(&qtq, &identity, 1e-12, "Q^T*Q = I");
    }
}

#[test]
fn r_is_upper_triangular() {
    let a = pseudo_random_matrix(5, 4, 71);
    let qr = QrDecomposition::new(&a).unwrap();
    let r = qr.r();
    for i in 0..4 {
        for j in 0..i {
            assert_eq!(r.get(i, j), 0.0);
        }
    }
}

#[test]
fn householder_vectors_are_lower_trapezoidal() {
    let a = pseudo_random_matrix(5, 3, 73);
    let qr = QrDecomposition::new(&a).unwrap();
    let h = qr.h();
    assert_eq!(h.rows(), 5);
    assert_eq!(h.cols(), 3);
    for i in 0..5 {
        for j in (i + 1)..3 {
            assert_eq!(h.get(i, j), 0.0);
        }
    }
    // The diagonal entries carry the 1 + normalized-entry encoding, so
    // they are at least 1 in magnitude for nonzero columns.
    for k in 0..3 {
        assert!(h.get(k, k).abs() >= 1.0);
    }
}

#[test]
fn square_solve_matches_the_exact_solution() {
    let a = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![4.0, 3.0]]).unwrap();
    let qr = QrDecomposition::new(&a).unwrap();
    let x = qr.solve(&[1.0, 1.0]).unwrap();
    assert_allclose_f64(&x, &[1.0, -1.0], 0.0, 1e-12, "square solve");
}

#[test]
fn overdetermined_solve_recovers_exactly_consistent_data() {
    // Points on the line y = 2x + 1; the least-squares fit is exact.
    let a = DenseMatrix::from_rows(&[
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![1.0, 2.0],
        vec![1.0, 3.0],
    ])
    .unwrap();
    let b = [1.0, 3.0, 5.0, 7.0];
    let qr = QrDecomposition::new(&a).unwrap();
    let x = qr.solve(&b).unwrap();
    assert_allclose_f64(&x, &[1.0, 2.0], 0.0, 1e-12, "line fit");
}

#[test]
fn overdetermined_solve_minimizes_the_residual_norm() {
    let a = pseudo_random_matrix(6, 3, 79);
    let qr = QrDecomposition::new(&a).unwrap();
    let b: Vec<f64> = (0..6).map(|i| common::pseudo_random(997 + i)).collect();
    let x = qr.solve(&b).unwrap();

    // At the least-squares minimum the residual is orthogonal to the
    // column space: A^T (Ax - b) = 0.
    let mut residual = vec![0.0; 6];
    for i in 0..6 {
        let ax: f64 = (0..3).map(|j| a.get(i, j) * x[j]).sum();
        residual[i] = ax - b[i];
    }
    for j in 0..3 {
        let at_r: f64 = (0..6).map(|i| a.get(i, j) * residual[i]).sum();
        assert!(at_r.abs() < 1e-10, "A^T r != 0 in column {}", j);
    }
}

#[test]
fn solve_matrix_handles_multiple_right_hand_sides() {
    let a = pseudo_random_matrix(5, 3, 83);
    let qr = QrDecomposition::new(&a).unwrap();
    let b = pseudo_random_matrix(5, 2, 89);
    let x = qr.solve_matrix(&b).unwrap();
    assert_eq!(x.rows(), 3);
    assert_eq!(x.cols(), 2);
    for j in 0..2 {
        let column: Vec<f64> = (0..5).map(|i| b.get(i, j)).collect();
        let single = qr.solve(&column).unwrap();
        for i in 0..3 {
            assert!((x.get(i, j) - single[i]).abs() < 1e-12);
        }
    }
}

#[test]
fn rank_deficient_input_factors_but_refuses_to_solve() {
    // A zero column leaves a zero entry on the diagonal of R.
    let a = DenseMatrix::from_rows(&[
        vec![1.0, 0.0],
        vec![2.0, 0.0],
        vec![3.0, 0.0],
    ])
    .unwrap();
    let qr = QrDecomposition::new(&a).unwrap();
    assert!(!qr.is_full_rank());
    assert!(matches!(qr.solve(&[1.0, 1.0, 1.0]), Err(Error::RankDeficient)));
    // Reconstruction still holds for the rank-deficient factorization.
    let product = qr.q().matmul(&qr.r()).unwrap();
    assert_matrix_close(&product, &a, 1e-12, "rank-deficient Q*R = A");
}

#[test]
fn wide_matrices_are_rejected() {
    let wide = DenseMatrix::zeros(2, 3).unwrap();
    assert!(matches!(
        QrDecomposition::new(&wide),
        Err(Error::NotTall { rows: 2, cols: 3 })
    ));
}

#[test]
fn solve_rejects_wrong_row_count() {
    let a = pseudo_random_matrix(4, 2, 91);
    let qr = QrDecomposition::new(&a).unwrap();
    assert!(qr.solve(&[1.0, 2.0]).is_err());
    let b = pseudo_random_matrix(3, 2, 93);
    assert!(qr.solve_matrix(&b).is_err());
}

#[test]
fn flat_and_row_constructors_agree() {
    let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 7.0]];
    let from_rows = QrDecomposition::from_rows_with_dims(&rows, 3, 2, true).unwrap();
    let flat_row_major = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0];
    let from_flat =
        QrDecomposition::from_flat(&flat_row_major, MajorOrder::RowMajor, 3, 2).unwrap();
    let flat_col_major = [1.0, 3.0, 5.0, 2.0, 4.0, 7.0];
    let from_col =
        QrDecomposition::from_flat(&flat_col_major, MajorOrder::ColumnMajor, 3, 2).unwrap();

    let b = [1.0, 1.0, 1.0];
    let expected = from_rows.solve(&b).unwrap();
    assert_eq!(from_flat.solve(&b).unwrap(), expected);
    assert_eq!(from_col.solve(&b).unwrap(), expected);
}

#[test]
fn dimensions_are_reported() {
    let a = pseudo_random_matrix(6, 4, 95);
    let qr = QrDecomposition::new(&a).unwrap();
    assert_eq!(qr.rows(), 6);
    assert_eq!(qr.cols(), 4);
}
