//! Cholesky decomposition for symmetric positive-definite matrices

use super::TriangularDecomposition;
use crate::accum::{Accumulator, KahanSum};
use crate::error::{Error, Result};
use crate::matrix::{DenseMatrix, MajorOrder};
use crate::permutation::Permutation;

/// Cholesky decomposition of a symmetric positive-definite matrix:
/// `A = LL^T`.
///
/// Within the triangular contract, P is always the identity and U is
/// `L^T`, read from the single lower-triangular buffer by transposed
/// indexing; elimination never touches the upper triangle.
///
/// Construction fails with [`Error::NotPositiveDefinite`] as soon as a
/// diagonal radicand comes out non-positive; a matrix with a negative
/// eigenvalue is rejected rather than producing NaN factors.
///
/// The determinant is accumulated during factorization as the product of
/// the pre-sqrt radicands, which equals `det(A)` exactly since
/// `det(A) = prod(L[i][i]^2)`.
pub struct CholeskyDecomposition {
    l: DenseMatrix,
    det: f64,
}

impl CholeskyDecomposition {
    /// Decompose a copy of `a`, which must be square and symmetric
    /// positive-definite.
    ///
    /// Symmetry is not checked; only the lower triangle of `a` is read.
    pub fn new(a: &DenseMatrix) -> Result<Self> {
        super::validate_square(a)?;
        Self::from_buffer(a.clone())
    }

    /// Decompose `a` in place, taking ownership of its buffer as the L
    /// storage.
    pub fn from_buffer(mut a: DenseMatrix) -> Result<Self> {
        let n = super::validate_square(&a)?;
        let det = factor(a.as_mut_slice(), n)?;
        Ok(Self { l: a, det })
    }

    /// Decompose a matrix given as nested row arrays with explicit size.
    ///
    /// When not `strict`, rows may be longer than `n`; trailing entries
    /// are ignored.
    pub fn from_rows_with_dims(rows: &[Vec<f64>], n: usize, strict: bool) -> Result<Self> {
        Self::from_buffer(DenseMatrix::from_rows_with_dims(rows, n, n, strict)?)
    }

    /// Decompose a matrix given as a flat buffer of `n * n` values.
    ///
    /// The distinction between row-major and column-major order does not
    /// matter for symmetric matrices, so no order flag is taken.
    pub fn from_flat(flat: &[f64], n: usize) -> Result<Self> {
        Self::from_buffer(DenseMatrix::from_flat(flat, MajorOrder::RowMajor, n, n)?)
    }
}

/// Cholesky-Banachiewicz factorization, row by row, in place.
///
/// Both inner products run through the Kahan accumulator; they are the
/// dominant source of cancellation error here.
fn factor(l: &mut [f64], n: usize) -> Result<f64> {
    let mut det = 1.0;
    let mut acc = KahanSum::new();
    for i in 0..n {
        for j in 0..i {
            acc.reset();
            for k in 0..j {
                acc.add(l[i * n + k] * l[j * n + k]);
            }
            l[i * n + j] = (l[i * n + j] - acc.sum()) / l[j * n + j];
        }
        acc.reset();
        for k in 0..i {
            let term = l[i * n + k];
            acc.add(term * term);
        }
        let radicand = l[i * n + i] - acc.sum();
        det *= radicand;
        if radicand <= 0.0 {
            return Err(Error::NotPositiveDefinite {
                index: i,
                value: radicand,
            });
        }
        l[i * n + i] = radicand.sqrt();
    }
    Ok(det)
}

impl TriangularDecomposition for CholeskyDecomposition {
    fn rows(&self) -> usize {
        self.l.rows()
    }

    fn cols(&self) -> usize {
        self.l.cols()
    }

    fn p(&self) -> Permutation {
        Permutation::identity(self.l.rows())
    }

    fn l(&self) -> DenseMatrix {
        let n = self.l.rows();
        let mut result = DenseMatrix::zeros_unchecked(n, n);
        for i in 0..n {
            for j in 0..=i {
                result.set(i, j, self.l.get(i, j));
            }
        }
        result
    }

    /// `L^T`, read by transposed indexing; the stored upper triangle is
    /// never consulted.
    fn u(&self) -> DenseMatrix {
        let n = self.l.rows();
        let mut result = DenseMatrix::zeros_unchecked(n, n);
        for i in 0..n {
            for j in i..n {
                result.set(i, j, self.l.get(j, i));
            }
        }
        result
    }

    fn det(&self) -> Result<f64> {
        Ok(self.det)
    }

    fn is_nonsingular(&self) -> bool {
        self.det != 0.0
    }

    fn solve_into(&self, x: &mut [f64], b: &[f64]) -> Result<()> {
        let n = self.l.rows();
        if b.len() != n || x.len() != n {
            return Err(Error::WrongVectorLength {
                expected: n,
                got: b.len().min(x.len()),
            });
        }
        if !self.is_nonsingular() {
            return Err(Error::Singular);
        }
        // Forward substitution with L.
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= self.l.get(i, k) * x[k];
            }
            x[i] = sum / self.l.get(i, i);
        }
        // Backward substitution with L^T, via transposed indexing.
        for i in (0..n).rev() {
            let mut sum = x[i];
            for k in (i + 1)..n {
                sum -= self.l.get(k, i) * x[k];
            }
            x[i] = sum / self.l.get(i, i);
        }
        Ok(())
    }

    fn solve_matrix(&self, b: &DenseMatrix) -> Result<DenseMatrix> {
        let n = self.l.rows();
        if b.rows() != n {
            return Err(Error::DimensionMismatch {
                lhs_rows: n,
                lhs_cols: n,
                rhs_rows: b.rows(),
                rhs_cols: b.cols(),
            });
        }
        if !self.is_nonsingular() {
            return Err(Error::Singular);
        }
        let nb = b.cols();
        let mut x = b.clone();
        let buf = x.as_mut_slice();
        for j in 0..nb {
            for i in 0..n {
                let mut sum = buf[i * nb + j];
                for k in 0..i {
                    sum -= self.l.get(i, k) * buf[k * nb + j];
                }
                buf[i * nb + j] = sum / self.l.get(i, i);
            }
            for i in (0..n).rev() {
                let mut sum = buf[i * nb + j];
                for k in (i + 1)..n {
                    sum -= self.l.get(k, i) * buf[k * nb + j];
                }
                buf[i * nb + j] = sum / self.l.get(i, i);
            }
        }
        Ok(x)
    }
}
