//! Matrix decompositions
//!
//! This module defines the contract shared by the triangular
//! factorizations (LU and Cholesky) and hosts the three decomposition
//! implementations. A decomposition is computed once at construction;
//! `solve`, `inverse`, and `det` reuse the stored factorization without
//! re-deriving it.
//!
//! [`QrDecomposition`] does not implement the triangular contract (its Q
//! factor is orthogonal, not triangular) but shares the same matrix
//! representation conventions.

mod cholesky;
mod lu;
mod qr;

pub use cholesky::CholeskyDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;

use crate::error::{Error, Result};
use crate::matrix::{DenseMatrix, MajorOrder};
use crate::permutation::Permutation;

/// Contract for factorizations of the form `PA = LU`.
///
/// Implementors store a compact factorization at construction time.
/// `P`, `L`, and `U` are derived views; `solve` and `inverse` run
/// forward/backward substitution against the stored factors.
pub trait TriangularDecomposition {
    /// Number of rows of the factored matrix.
    fn rows(&self) -> usize;

    /// Number of columns of the factored matrix.
    fn cols(&self) -> usize;

    /// The permutation P with `PA = LU`.
    fn p(&self) -> Permutation;

    /// The lower triangular factor L.
    fn l(&self) -> DenseMatrix;

    /// The upper triangular factor U.
    fn u(&self) -> DenseMatrix;

    /// Determinant of the factored matrix.
    ///
    /// Fails if the factored matrix is not square.
    fn det(&self) -> Result<f64>;

    /// Whether the factored matrix is square with no zero entry on the
    /// triangular factor's diagonal.
    fn is_nonsingular(&self) -> bool;

    /// Solve `Ax = b`, writing the solution into `x`.
    ///
    /// Fails if the factorization is singular or the lengths mismatch.
    fn solve_into(&self, x: &mut [f64], b: &[f64]) -> Result<()>;

    /// Solve `Ax = b`, returning the solution.
    fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let mut x = vec![0.0; self.cols()];
        self.solve_into(&mut x, b)?;
        Ok(x)
    }

    /// Solve `AX = B` for multiple right-hand sides sharing the same
    /// factorization.
    fn solve_matrix(&self, b: &DenseMatrix) -> Result<DenseMatrix>;

    /// The inverse of the factored matrix.
    ///
    /// Solves against each standard basis vector, reusing the stored
    /// factorization.
    fn inverse(&self) -> Result<DenseMatrix> {
        let n = self.cols();
        let mut out = vec![0.0; n * n];
        self.inverse_into(&mut out, MajorOrder::RowMajor)?;
        DenseMatrix::from_vec(out, n, n)
    }

    /// Write the inverse into a caller-provided flat buffer in the
    /// requested major order.
    fn inverse_into(&self, out: &mut [f64], order: MajorOrder) -> Result<()> {
        let n = self.cols();
        if !self.is_nonsingular() {
            return Err(Error::Singular);
        }
        if out.len() < n * n {
            return Err(Error::FlatTooShort {
                len: out.len(),
                rows: n,
                cols: n,
            });
        }
        let mut column = vec![0.0; n];
        let mut x = vec![0.0; n];
        for j in 0..n {
            column[j] = 1.0;
            self.solve_into(&mut x, &column)?;
            match order {
                MajorOrder::RowMajor => {
                    for i in 0..n {
                        out[n * i + j] = x[i];
                    }
                }
                MajorOrder::ColumnMajor => {
                    for i in 0..n {
                        out[i + n * j] = x[i];
                    }
                }
            }
            column[j] = 0.0;
        }
        Ok(())
    }
}

/// Require a square matrix, returning its size.
pub(crate) fn validate_square(a: &DenseMatrix) -> Result<usize> {
    if a.rows() != a.cols() {
        return Err(Error::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    Ok(a.rows())
}
