//! LU decomposition with partial pivoting

use super::TriangularDecomposition;
use crate::error::{Error, Result};
use crate::matrix::{DenseMatrix, MajorOrder};
use crate::permutation::Permutation;

/// LU decomposition of an m x n matrix: `PA = LU`.
///
/// L is lower triangular with an implicit unit diagonal, U is upper
/// triangular, and P is the row-exchange [`Permutation`] accumulated
/// during partial pivoting. Both factors are packed into a single m x n
/// buffer: the strictly lower entries hold L's multipliers, the diagonal
/// and upper entries hold U.
///
/// Factorization never fails: a singular matrix factors successfully, and
/// only `solve`, `inverse`, and `det` reject it afterward.
///
/// The pivot row is chosen by the largest absolute value in the
/// *partially eliminated* column. Selecting it from the original matrix
/// instead is a known-incorrect shortcut that can leave a zero pivot for
/// matrices this procedure handles fine.
pub struct LuDecomposition {
    lu: DenseMatrix,
    permutation: Permutation,
}

impl LuDecomposition {
    /// Decompose a copy of `a`, leaving the caller's matrix untouched.
    pub fn new(a: &DenseMatrix) -> Self {
        Self::from_buffer(a.clone())
    }

    /// Decompose `a` in place, taking ownership of its buffer.
    ///
    /// This avoids a copy when the caller no longer needs the original
    /// matrix.
    pub fn from_buffer(a: DenseMatrix) -> Self {
        let (lu, permutation) = factor(a);
        Self { lu, permutation }
    }

    /// Decompose a matrix given as nested row arrays with explicit
    /// dimensions.
    ///
    /// When not `strict`, rows may be longer than `n`; trailing entries
    /// are ignored.
    pub fn from_rows_with_dims(
        rows: &[Vec<f64>],
        m: usize,
        n: usize,
        strict: bool,
    ) -> Result<Self> {
        Ok(Self::from_buffer(DenseMatrix::from_rows_with_dims(
            rows, m, n, strict,
        )?))
    }

    /// Decompose a matrix given as a flat buffer in the stated major
    /// order.
    pub fn from_flat(flat: &[f64], order: MajorOrder, m: usize, n: usize) -> Result<Self> {
        Ok(Self::from_buffer(DenseMatrix::from_flat(flat, order, m, n)?))
    }
}

/// Column-oriented Gaussian elimination with partial pivoting.
///
/// For each column, every row's elimination value is first brought up to
/// date with a running inner product against the previously eliminated
/// columns (`min(i, j)` terms); the pivot is then selected from those
/// post-elimination values and the sub-diagonal entries are scaled by it.
fn factor(mut matrix: DenseMatrix) -> (DenseMatrix, Permutation) {
    let m = matrix.rows();
    let n = matrix.cols();
    let mut permutation = Permutation::identity(m);
    // Shadow pivot bookkeeping, cross-checked against the permutation
    // after every column. A divergence is a programming error, so this
    // stays a debug assertion.
    #[cfg(debug_assertions)]
    let mut pivot_shadow: Vec<usize> = (0..m).collect();

    let buf = matrix.as_mut_slice();
    let mut col_j = vec![0.0; m];

    for j in 0..n {
        for (i, col) in col_j.iter_mut().enumerate() {
            *col = buf[i * n + j];
        }
        for i in 0..m {
            let terms = i.min(j);
            let mut sum = 0.0;
            for k in 0..terms {
                sum += buf[i * n + k] * col_j[k];
            }
            col_j[i] -= sum;
            buf[i * n + j] = col_j[i];
        }

        // Pivot on the largest post-elimination value at or below the
        // diagonal.
        let mut piv = j;
        for i in (j + 1)..m {
            if col_j[i].abs() > col_j[piv].abs() {
                piv = i;
            }
        }
        if piv != j {
            for k in 0..n {
                buf.swap(piv * n + k, j * n + k);
            }
            permutation.swap(piv, j);
            #[cfg(debug_assertions)]
            pivot_shadow.swap(piv, j);
        }
        #[cfg(debug_assertions)]
        debug_assert_eq!(
            permutation.vector(),
            &pivot_shadow[..],
            "pivot bookkeeping diverged from the permutation"
        );

        if j < m && buf[j * n + j] != 0.0 {
            let pivot = buf[j * n + j];
            for i in (j + 1)..m {
                buf[i * n + j] /= pivot;
            }
        }
    }
    (matrix, permutation)
}

impl TriangularDecomposition for LuDecomposition {
    fn rows(&self) -> usize {
        self.lu.rows()
    }

    fn cols(&self) -> usize {
        self.lu.cols()
    }

    fn p(&self) -> Permutation {
        self.permutation.clone()
    }

    /// The m x n lower trapezoidal factor, with a unit diagonal.
    fn l(&self) -> DenseMatrix {
        let m = self.lu.rows();
        let n = self.lu.cols();
        let mut result = DenseMatrix::zeros_unchecked(m, n);
        for i in 0..m {
            for j in 0..i.min(n) {
                result.set(i, j, self.lu.get(i, j));
            }
            if i < n {
                result.set(i, i, 1.0);
            }
        }
        result
    }

    /// The n x n upper triangular factor.
    fn u(&self) -> DenseMatrix {
        let m = self.lu.rows();
        let n = self.lu.cols();
        let mut result = DenseMatrix::zeros_unchecked(n, n);
        for i in 0..m.min(n) {
            for j in i..n {
                result.set(i, j, self.lu.get(i, j));
            }
        }
        result
    }

    fn det(&self) -> Result<f64> {
        let n = super::validate_square(&self.lu)?;
        // P's determinant is +/-1, flipped once per row exchange.
        let mut result = self.permutation.det();
        for j in 0..n {
            result *= self.lu.get(j, j);
        }
        Ok(result)
    }

    fn is_nonsingular(&self) -> bool {
        let m = self.lu.rows();
        let n = self.lu.cols();
        if m != n {
            return false;
        }
        (0..n).all(|j| self.lu.get(j, j) != 0.0)
    }

    fn solve_into(&self, x: &mut [f64], b: &[f64]) -> Result<()> {
        let n = self.lu.cols();
        if b.len() != n || x.len() != n {
            return Err(Error::WrongVectorLength {
                expected: n,
                got: b.len().min(x.len()),
            });
        }
        if !self.is_nonsingular() {
            return Err(Error::Singular);
        }
        self.permutation.apply_into(b, x)?;
        // Forward substitution; L's diagonal is an implicit 1.
        for k in 0..n {
            for i in (k + 1)..n {
                x[i] -= x[k] * self.lu.get(i, k);
            }
        }
        // Backward substitution.
        for k in (0..n).rev() {
            x[k] /= self.lu.get(k, k);
            for i in 0..k {
                x[i] -= x[k] * self.lu.get(i, k);
            }
        }
        Ok(())
    }

    fn solve_matrix(&self, b: &DenseMatrix) -> Result<DenseMatrix> {
        let n = self.lu.cols();
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
        let mut x = self.permutation.apply_rows(b)?;
        let buf = x.as_mut_slice();
        for k in 0..n {
            for i in (k + 1)..n {
                let multiplier = self.lu.get(i, k);
                for j in 0..nb {
                    buf[i * nb + j] -= buf[k * nb + j] * multiplier;
                }
            }
        }
        for k in (0..n).rev() {
            let pivot = self.lu.get(k, k);
            for j in 0..nb {
                buf[k * nb + j] /= pivot;
            }
            for i in 0..k {
                let multiplier = self.lu.get(i, k);
                for j in 0..nb {
                    buf[i * nb + j] -= buf[k * nb + j] * multiplier;
                }
            }
        }
        Ok(x)
    }
}
