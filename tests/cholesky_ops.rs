//! Integration tests for Cholesky decomposition
//!
//! Tests verify:
//! - Reconstruction L*L^T = A within tolerance
//! - Rejection of non-positive-definite input with index and value
//! - The triangular contract (P identity, U = L^T)
//! - Solving, determinant, and inversion against LU as a cross-check

mod common;

use common::{assert_allclose_f64, assert_matrix_close, spd_matrix};
use factr::decomp::{CholeskyDecomposition, LuDecomposition, TriangularDecomposition};
use factr::error::Error;
use factr::matrix::{DenseMatrix, MajorOrder};

fn wikipedia_example() -> DenseMatrix {
    DenseMatrix::from_rows(&[
        vec![4.0, 12.0, -16.0],
        vec![12.0, 37.0, -43.0],
        vec![-16.0, -43.0, 98.0],
    ])
    .unwrap()
}

#[test]
fn known_factorization_and_determinant() {
    let chol = CholeskyDecomposition::new(&wikipedia_example()).unwrap();
    let expected_l = DenseMatrix::from_rows(&[
        vec![2.0, 0.0, 0.0],
        vec![6.0, 1.0, 0.0],
        vec![-8.0, 5.0, 3.0],
    ])
    .unwrap();
    assert_matrix_close(&chol.l(), &expected_l, 1e-12, "L");
    assert!((chol.det().unwrap() - 36.0).abs() < 1e-9);
    assert!(chol.is_nonsingular());
}

#[test]
fn reconstruction_l_times_lt_equals_a() {
    for (n, seed) in [(1, 3), (4, 11), (7, 29)] {
        let a = spd_matrix(n, seed);
        let chol = CholeskyDecomposition::new(&a).unwrap();
        let l = chol.l();
        let product = l.matmul(&l.transpose()).unwrap();
        assert_matrix_close(&product, &a, 1e-9, "L*L^T = A");
    }
}

#[test]
fn u_is_the_transpose_of_l_and_p_is_identity() {
    let chol = CholeskyDecomposition::new(&wikipedia_example()).unwrap();
    assert_matrix_close(&chol.u(), &chol.l().transpose(), 0.0, "U = L^T");
    let p = chol.p();
    assert_eq!(p.vector(), &[0, 1, 2]);
    assert_eq!(p.det(), 1.0);
}

#[test]
fn non_positive_definite_input_fails_with_index_and_value() {
    // Indefinite: eigenvalues 3 and -1.
    let indefinite =
        DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
    match CholeskyDecomposition::new(&indefinite) {
        Err(Error::NotPositiveDefinite { index, value }) => {
            assert_eq!(index, 1);
            assert!((value - (-3.0)).abs() < 1e-12);
        }
        other => panic!("expected NotPositiveDefinite, got {:?}", other.err()),
    }

    // A zero diagonal fails immediately at row 0.
    let zero_diag =
        DenseMatrix::from_rows(&[vec![0.0, 0.0], vec![0.0, 1.0]]).unwrap();
    match CholeskyDecomposition::new(&zero_diag) {
        Err(Error::NotPositiveDefinite { index, value }) => {
            assert_eq!(index, 0);
            assert_eq!(value, 0.0);
        }
        other => panic!("expected NotPositiveDefinite, got {:?}", other.err()),
    }
}

#[test]
fn rejects_non_square_input() {
    let rect = DenseMatrix::zeros(3, 2).unwrap();
    assert!(matches!(
        CholeskyDecomposition::new(&rect),
        Err(Error::NotSquare { rows: 3, cols: 2 })
    ));
}

#[test]
fn solve_agrees_with_lu() {
    let a = spd_matrix(5, 47);
    let chol = CholeskyDecomposition::new(&a).unwrap();
    let lu = LuDecomposition::new(&a);
    let b: Vec<f64> = (0..5).map(|i| 1.0 - i as f64 * 0.25).collect();

    let x_chol = chol.solve(&b).unwrap();
    let x_lu = lu.solve(&b).unwrap();
    assert_allclose_f64(&x_chol, &x_lu, 1e-9, 1e-9, "Cholesky vs LU solve");

    // The residual itself is small.
    for i in 0..5 {
        let ax: f64 = (0..5).map(|j| a.get(i, j) * x_chol[j]).sum();
        assert!((ax - b[i]).abs() < 1e-9);
    }
}

#[test]
fn batched_solve_matches_columnwise_solves() {
    let a = spd_matrix(4, 53);
    let chol = CholeskyDecomposition::new(&a).unwrap();
    let b = common::pseudo_random_matrix(4, 2, 59);
    let x = chol.solve_matrix(&b).unwrap();
    for j in 0..2 {
        let column: Vec<f64> = (0..4).map(|i| b.get(i, j)).collect();
        let single = chol.solve(&column).unwrap();
        for i in 0..4 {
            assert!((x.get(i, j) - single[i]).abs() < 1e-12);
        }
    }
}

#[test]
fn solve_rejects_wrong_lengths() {
    let chol = CholeskyDecomposition::new(&wikipedia_example()).unwrap();
    assert!(chol.solve(&[1.0, 2.0]).is_err());
    let mut x = [0.0; 2];
    assert!(chol.solve_into(&mut x, &[1.0, 2.0, 3.0]).is_err());
}

#[test]
fn inverse_times_original_is_identity() {
    let a = wikipedia_example();
    let chol = CholeskyDecomposition::new(&a).unwrap();
    let inverse = chol.inverse().unwrap();
    let product = a.matmul(&inverse).unwrap();
    let identity = DenseMatrix::identity(3).unwrap();
    assert_matrix_close(&product, &identity, 1e-9, "A*A^-1 = I");

    // Flat output in both major orders: the inverse of a symmetric
    // matrix is symmetric, so both orders agree entry for entry.
    let mut row_major = [0.0; 9];
    chol.inverse_into(&mut row_major, MajorOrder::RowMajor)
        .unwrap();
    let mut col_major = [0.0; 9];
    chol.inverse_into(&mut col_major, MajorOrder::ColumnMajor)
        .unwrap();
    assert_allclose_f64(&row_major, &col_major, 0.0, 1e-12, "symmetric inverse");
    assert_allclose_f64(&row_major, inverse.as_slice(), 0.0, 0.0, "flat vs matrix");
}

#[test]
fn determinant_is_the_product_of_radicands() {
    let a = spd_matrix(6, 61);
    let chol = CholeskyDecomposition::new(&a).unwrap();
    let lu = LuDecomposition::new(&a);
    let det_chol = chol.det().unwrap();
    let det_lu = lu.det().unwrap();
    assert!(
        (det_chol - det_lu).abs() <= 1e-9 * det_lu.abs(),
        "Cholesky det {} vs LU det {}",
        det_chol,
        det_lu
    );
}

#[test]
fn flat_constructor_needs_no_order_flag() {
    let a = wikipedia_example();
    let chol = CholeskyDecomposition::from_flat(a.as_slice(), 3).unwrap();
    assert!((chol.det().unwrap() - 36.0).abs() < 1e-9);
}

#[test]
fn from_buffer_reuses_the_callers_storage() {
    let a = wikipedia_example();
    let chol = CholeskyDecomposition::from_buffer(a).unwrap();
    assert!((chol.det().unwrap() - 36.0).abs() < 1e-9);
}

#[test]
fn ragged_rows_allowed_only_when_not_strict() {
    let rows = vec![
        vec![4.0, 12.0, -16.0, 0.0],
        vec![12.0, 37.0, -43.0],
        vec![-16.0, -43.0, 98.0],
    ];
    let chol = CholeskyDecomposition::from_rows_with_dims(&rows, 3, false).unwrap();
    assert!((chol.det().unwrap() - 36.0).abs() < 1e-9);
    assert!(CholeskyDecomposition::from_rows_with_dims(&rows, 3, true).is_err());
}
