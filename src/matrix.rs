//! Dense matrix storage and input validation
//!
//! All decompositions in this crate operate on [`DenseMatrix`], a flat
//! row-major `Vec<f64>` with explicit dimensions. Callers can build one
//! from nested row arrays (ragged rows tolerated unless `strict`) or from
//! a flat buffer in either major order, matching the C (row-major) and
//! Fortran (column-major) conventions.

use crate::error::{Error, Result};

/// Element order of a flat matrix buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorOrder {
    /// Row index varies slowest (C convention)
    RowMajor,
    /// Column index varies slowest (Fortran convention)
    ColumnMajor,
}

/// A dense m x n matrix of f64 values, stored row major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    m: usize,
    n: usize,
}

fn check_dims(m: usize, n: usize) -> Result<()> {
    if m == 0 {
        return Err(Error::ZeroDimension { arg: "rows" });
    }
    if n == 0 {
        return Err(Error::ZeroDimension { arg: "cols" });
    }
    Ok(())
}

impl DenseMatrix {
    /// Create an m x n matrix of zeros.
    pub fn zeros(m: usize, n: usize) -> Result<Self> {
        check_dims(m, n)?;
        Ok(Self {
            data: vec![0.0; m * n],
            m,
            n,
        })
    }

    // For derived views whose dimensions come from an already-validated
    // matrix.
    pub(crate) fn zeros_unchecked(m: usize, n: usize) -> Self {
        Self {
            data: vec![0.0; m * n],
            m,
            n,
        }
    }

    /// Create the n x n identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut result = Self::zeros(n, n)?;
        for i in 0..n {
            result.data[i * n + i] = 1.0;
        }
        Ok(result)
    }

    /// Take ownership of a row-major buffer without copying.
    ///
    /// The buffer must hold exactly `m * n` values. This is the
    /// ownership-transfer constructor: the caller gives up the buffer and
    /// any decomposition built from the matrix may factor it in place.
    pub fn from_vec(data: Vec<f64>, m: usize, n: usize) -> Result<Self> {
        check_dims(m, n)?;
        if data.len() != m * n {
            return Err(Error::FlatTooShort {
                len: data.len(),
                rows: m,
                cols: n,
            });
        }
        Ok(Self { data, m, n })
    }

    /// Copy a flat buffer in the stated major order.
    ///
    /// The buffer may be longer than `m * n`; trailing entries are ignored.
    pub fn from_flat(flat: &[f64], order: MajorOrder, m: usize, n: usize) -> Result<Self> {
        check_dims(m, n)?;
        if flat.len() < m * n {
            return Err(Error::FlatTooShort {
                len: flat.len(),
                rows: m,
                cols: n,
            });
        }
        let mut data = vec![0.0; m * n];
        match order {
            MajorOrder::RowMajor => data.copy_from_slice(&flat[..m * n]),
            MajorOrder::ColumnMajor => {
                let mut index = 0;
                for j in 0..n {
                    for i in 0..m {
                        data[i * n + j] = flat[index];
                        index += 1;
                    }
                }
            }
        }
        Ok(Self { data, m, n })
    }

    /// Copy nested row arrays; every row must have the same nonzero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::ZeroDimension { arg: "rows" });
        }
        let n = rows[0].len();
        Self::from_rows_with_dims(rows, rows.len(), n, true)
    }

    /// Copy nested row arrays with explicit dimensions.
    ///
    /// When `strict` each of the first `m` rows must have length exactly
    /// `n`. Otherwise rows may be longer than `n`; trailing entries are
    /// ignored. Rows shorter than `n` are always an error.
    pub fn from_rows_with_dims(rows: &[Vec<f64>], m: usize, n: usize, strict: bool) -> Result<Self> {
        check_dims(m, n)?;
        if rows.len() < m {
            return Err(Error::MissingRows {
                expected: m,
                got: rows.len(),
            });
        }
        for (i, row) in rows.iter().enumerate().take(m) {
            let len = row.len();
            if (strict && len != n) || len < n {
                return Err(Error::WrongRowSize {
                    row: i,
                    expected: n,
                    got: len,
                });
            }
        }
        let mut data = vec![0.0; m * n];
        for i in 0..m {
            data[i * n..(i + 1) * n].copy_from_slice(&rows[i][..n]);
        }
        Ok(Self { data, m, n })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.m
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.n
    }

    /// Element at row `i`, column `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Set the element at row `i`, column `j`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    /// The underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major buffer.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Consume the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copy the elements out in the requested major order.
    pub fn to_flat(&self, order: MajorOrder) -> Vec<f64> {
        match order {
            MajorOrder::RowMajor => self.data.clone(),
            MajorOrder::ColumnMajor => {
                let mut flat = vec![0.0; self.m * self.n];
                let mut index = 0;
                for j in 0..self.n {
                    for i in 0..self.m {
                        flat[index] = self.data[i * self.n + j];
                        index += 1;
                    }
                }
                flat
            }
        }
    }

    /// The transpose as a new matrix.
    pub fn transpose(&self) -> DenseMatrix {
        let mut data = vec![0.0; self.m * self.n];
        for i in 0..self.m {
            for j in 0..self.n {
                data[j * self.m + i] = self.data[i * self.n + j];
            }
        }
        DenseMatrix {
            data,
            m: self.n,
            n: self.m,
        }
    }

    /// Matrix product `self * rhs`.
    pub fn matmul(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        if self.n != rhs.m {
            return Err(Error::DimensionMismatch {
                lhs_rows: self.m,
                lhs_cols: self.n,
                rhs_rows: rhs.m,
                rhs_cols: rhs.n,
            });
        }
        let mut data = vec![0.0; self.m * rhs.n];
        for i in 0..self.m {
            for k in 0..self.n {
                let aik = self.data[i * self.n + k];
                if aik == 0.0 {
                    continue;
                }
                for j in 0..rhs.n {
                    data[i * rhs.n + j] += aik * rhs.data[k * rhs.n + j];
                }
            }
        }
        Ok(DenseMatrix {
            data,
            m: self.m,
            n: rhs.n,
        })
    }
}
