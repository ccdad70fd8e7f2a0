//! Householder QR decomposition

use crate::error::{Error, Result};
use crate::matrix::{DenseMatrix, MajorOrder};

/// QR decomposition of an m x n matrix with `m >= n`: `A = QR`.
///
/// Q is an m x n matrix with orthonormal columns and R is n x n upper
/// triangular (the "thin" or economy-size factorization). The
/// decomposition always exists, even for rank-deficient input, so
/// construction only fails on malformed shapes; least-squares solving
/// fails afterward when [`QrDecomposition::is_full_rank`] is false.
///
/// Storage is compact: the buffer's lower trapezoid holds the Householder
/// vectors, its strict upper triangle holds R's off-diagonal entries, and
/// R's diagonal lives in a separate array (`rdiag`), sign-flipped against
/// the working diagonal to avoid cancellation. The buffer's diagonal
/// itself holds `1 + normalized entry`, part of the Householder encoding,
/// not R.
pub struct QrDecomposition {
    qr: DenseMatrix,
    rdiag: Vec<f64>,
}

/// Two-term hypotenuse, scaled by the larger magnitude so that neither
/// square can overflow or underflow.
fn hypot(a: f64, b: f64) -> f64 {
    if a.abs() > b.abs() {
        let r = b / a;
        a.abs() * (1.0 + r * r).sqrt()
    } else if b != 0.0 {
        let r = a / b;
        b.abs() * (1.0 + r * r).sqrt()
    } else {
        0.0
    }
}

impl QrDecomposition {
    /// Decompose a copy of `a`, which must have at least as many rows as
    /// columns.
    pub fn new(a: &DenseMatrix) -> Result<Self> {
        Self::from_buffer(a.clone())
    }

    /// Decompose `a` in place, taking ownership of its buffer.
    pub fn from_buffer(mut a: DenseMatrix) -> Result<Self> {
        if a.rows() < a.cols() {
            return Err(Error::NotTall {
                rows: a.rows(),
                cols: a.cols(),
            });
        }
        let rdiag = factor(&mut a);
        Ok(Self { qr: a, rdiag })
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
        Self::from_buffer(DenseMatrix::from_rows_with_dims(rows, m, n, strict)?)
    }

    /// Decompose a matrix given as a flat buffer in the stated major
    /// order.
    pub fn from_flat(flat: &[f64], order: MajorOrder, m: usize, n: usize) -> Result<Self> {
        Self::from_buffer(DenseMatrix::from_flat(flat, order, m, n)?)
    }

    /// Number of rows of the decomposed matrix.
    pub fn rows(&self) -> usize {
        self.qr.rows()
    }

    /// Number of columns of the decomposed matrix.
    pub fn cols(&self) -> usize {
        self.qr.cols()
    }

    /// Whether the decomposed matrix has full column rank.
    ///
    /// Rank deficiency shows up as a zero entry on R's diagonal.
    pub fn is_full_rank(&self) -> bool {
        self.rdiag.iter().all(|&d| d != 0.0)
    }

    /// The raw Householder vectors as an m x n lower trapezoidal matrix.
    pub fn h(&self) -> DenseMatrix {
        let m = self.qr.rows();
        let n = self.qr.cols();
        let mut result = DenseMatrix::zeros_unchecked(m, n);
        for i in 0..m {
            for j in 0..=i.min(n - 1) {
                result.set(i, j, self.qr.get(i, j));
            }
        }
        result
    }

    /// The n x n upper triangular factor R.
    pub fn r(&self) -> DenseMatrix {
        let n = self.qr.cols();
        let mut result = DenseMatrix::zeros_unchecked(n, n);
        for i in 0..n {
            result.set(i, i, self.rdiag[i]);
            for j in (i + 1)..n {
                result.set(i, j, self.qr.get(i, j));
            }
        }
        result
    }

    /// The m x n orthogonal factor Q, reconstructed by applying the
    /// stored reflections to identity columns in reverse order.
    pub fn q(&self) -> DenseMatrix {
        let m = self.qr.rows();
        let n = self.qr.cols();
        let mut q = DenseMatrix::zeros_unchecked(m, n);
        for k in (0..n).rev() {
            for i in 0..m {
                q.set(i, k, 0.0);
            }
            q.set(k, k, 1.0);
            for j in k..n {
                if self.qr.get(k, k) != 0.0 {
                    let mut s = 0.0;
                    for i in k..m {
                        s += self.qr.get(i, k) * q.get(i, j);
                    }
                    s = -s / self.qr.get(k, k);
                    for i in k..m {
                        let updated = q.get(i, j) + s * self.qr.get(i, k);
                        q.set(i, j, updated);
                    }
                }
            }
        }
        q
    }

    /// Least-squares solution of `Ax = b`.
    ///
    /// `b` must have one entry per row of A; the result has one entry per
    /// column and minimizes the norm of `Ax - b`. The reflections are
    /// applied to `b` in forward order, computing `Q^T b` without ever
    /// materializing Q, followed by back substitution against R.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let m = self.qr.rows();
        let n = self.qr.cols();
        if b.len() != m {
            return Err(Error::WrongVectorLength {
                expected: m,
                got: b.len(),
            });
        }
        if !self.is_full_rank() {
            return Err(Error::RankDeficient);
        }
        let mut x = b.to_vec();
        for k in 0..n {
            let mut s = 0.0;
            for i in k..m {
                s += self.qr.get(i, k) * x[i];
            }
            s = -s / self.qr.get(k, k);
            for i in k..m {
                x[i] += s * self.qr.get(i, k);
            }
        }
        for k in (0..n).rev() {
            x[k] /= self.rdiag[k];
            for i in 0..k {
                x[i] -= x[k] * self.qr.get(i, k);
            }
        }
        x.truncate(n);
        Ok(x)
    }

    /// Least-squares solution of `AX = B` for multiple right-hand sides.
    pub fn solve_matrix(&self, b: &DenseMatrix) -> Result<DenseMatrix> {
        let m = self.qr.rows();
        let n = self.qr.cols();
        if b.rows() != m {
            return Err(Error::DimensionMismatch {
                lhs_rows: m,
                lhs_cols: n,
                rhs_rows: b.rows(),
                rhs_cols: b.cols(),
            });
        }
        if !self.is_full_rank() {
            return Err(Error::RankDeficient);
        }
        let nx = b.cols();
        let mut work = b.clone();
        let buf = work.as_mut_slice();
        for k in 0..n {
            for j in 0..nx {
                let mut s = 0.0;
                for i in k..m {
                    s += self.qr.get(i, k) * buf[i * nx + j];
                }
                s = -s / self.qr.get(k, k);
                for i in k..m {
                    buf[i * nx + j] += s * self.qr.get(i, k);
                }
            }
        }
        for k in (0..n).rev() {
            for j in 0..nx {
                buf[k * nx + j] /= self.rdiag[k];
            }
            for i in 0..k {
                for j in 0..nx {
                    buf[i * nx + j] -= buf[k * nx + j] * self.qr.get(i, k);
                }
            }
        }
        let mut result = DenseMatrix::zeros_unchecked(n, nx);
        for i in 0..n {
            for j in 0..nx {
                result.set(i, j, buf[i * nx + j]);
            }
        }
        Ok(result)
    }
}

/// Householder factorization in place, returning R's (negated) diagonal.
fn factor(matrix: &mut DenseMatrix) -> Vec<f64> {
    let m = matrix.rows();
    let n = matrix.cols();
    let qr = matrix.as_mut_slice();
    let mut rdiag = vec![0.0; n];

    for k in 0..n {
        // 2-norm of the k-th column below the diagonal, without
        // under/overflow.
        let mut nrm = 0.0;
        for i in k..m {
            nrm = hypot(nrm, qr[i * n + k]);
        }

        if nrm != 0.0 {
            // Take the norm's sign opposite to the diagonal entry so the
            // subtraction below cannot cancel.
            if qr[k * n + k] < 0.0 {
                nrm = -nrm;
            }
            for i in k..m {
                qr[i * n + k] /= nrm;
            }
            qr[k * n + k] += 1.0;

            // Apply the reflection to the remaining columns.
            for j in (k + 1)..n {
                let mut s = 0.0;
                for i in k..m {
                    s += qr[i * n + k] * qr[i * n + j];
                }
                s = -s / qr[k * n + k];
                for i in k..m {
                    qr[i * n + j] += s * qr[i * n + k];
                }
            }
        }
        rdiag[k] = -nrm;
    }
    rdiag
}
