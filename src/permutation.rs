//! Permutations of `[0, n)`
//!
//! A [`Permutation`] is a bijection on the integers `[0, n)`, written here
//! in bottom-line notation: applying it to a vector `v` yields a vector
//! `w` with `w[i] = v[p[i]]`. The LU decomposition uses one to record its
//! row-exchange history, so parity is tracked incrementally: every
//! [`Permutation::swap`] flips it, giving an O(1) determinant.
//!
//! The cycle representation produced by [`Permutation::cycles`] omits
//! fixed points and orders cycles by descending length, ties broken by
//! ascending first element. That ordering is the canonical serialized form
//! and must not change.

use crate::error::{Error, Result};
use crate::matrix::DenseMatrix;

/// A bijection on `[0, n)` with parity tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
    even: bool,
}

impl Permutation {
    /// The identity permutation on `[0, n)`.
    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
            even: true,
        }
    }

    /// Build a permutation from its bottom-line vector.
    ///
    /// Validates bijectivity and derives parity by walking the cycles:
    /// a cycle of length `k` contributes `k - 1` transpositions.
    pub fn from_vector(vector: Vec<usize>) -> Result<Self> {
        let n = vector.len();
        let mut seen = vec![false; n];
        for (i, &target) in vector.iter().enumerate() {
            if target >= n {
                return Err(Error::PermutationOutOfRange {
                    index: i,
                    value: target,
                    size: n,
                });
            }
            if seen[target] {
                return Err(Error::PermutationDuplicate { value: target });
            }
            seen[target] = true;
        }
        let mut transpositions = 0;
        for start in 0..n {
            if seen[start] {
                seen[start] = false;
                let mut next = vector[start];
                while next != start {
                    seen[next] = false;
                    transpositions += 1;
                    next = vector[next];
                }
            }
        }
        Ok(Self {
            perm: vector,
            even: transpositions % 2 == 0,
        })
    }

    /// Build a permutation of size `n` from a list of cycles.
    ///
    /// Each cycle lists 0-based indices in cycle-notation order; the
    /// resulting permutation maps each element to its successor in the
    /// cycle (the last wraps to the first). Elements not mentioned are
    /// fixed points.
    pub fn from_cycles(cycles: &[Vec<usize>], n: usize) -> Result<Self> {
        let mut perm: Vec<usize> = (0..n).collect();
        let mut transpositions = 0;
        for cycle in cycles {
            let len = cycle.len();
            if len > n {
                return Err(Error::CycleTooLong { len, size: n });
            }
            if len == 0 {
                continue;
            }
            transpositions += len - 1;
            for (j, &element) in cycle.iter().enumerate() {
                if element >= n {
                    return Err(Error::PermutationOutOfRange {
                        index: j,
                        value: element,
                        size: n,
                    });
                }
                let successor = cycle[(j + 1) % len];
                perm[element] = successor;
            }
        }
        let mut seen = vec![false; n];
        for &target in &perm {
            if seen[target] {
                return Err(Error::PermutationDuplicate { value: target });
            }
            seen[target] = true;
        }
        Ok(Self {
            perm,
            even: transpositions % 2 == 0,
        })
    }

    /// Build a permutation from its 0/1 permutation matrix.
    ///
    /// Column `j` must contain a single 1 at the row that column supplies.
    pub fn from_matrix(matrix: &DenseMatrix) -> Result<Self> {
        if matrix.rows() != matrix.cols() {
            return Err(Error::NotSquare {
                rows: matrix.rows(),
                cols: matrix.cols(),
            });
        }
        let n = matrix.rows();
        let mut vector = vec![0usize; n];
        for j in 0..n {
            let mut found = false;
            for i in 0..n {
                let entry = matrix.get(i, j);
                if entry == 1.0 {
                    if found {
                        return Err(Error::NotPermutationMatrix { index: j });
                    }
                    vector[j] = i;
                    found = true;
                } else if entry != 0.0 {
                    return Err(Error::NotPermutationMatrix { index: j });
                }
            }
            if !found {
                return Err(Error::NotPermutationMatrix { index: j });
            }
        }
        Self::from_vector(vector)
    }

    /// The number of integers the permutation is defined over.
    #[inline]
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    /// True for the empty permutation.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// The bottom-line vector defining the permutation.
    #[inline]
    pub fn vector(&self) -> &[usize] {
        &self.perm
    }

    /// Determinant of the permutation's matrix: `1.0` when even, `-1.0`
    /// when odd.
    #[inline]
    pub fn det(&self) -> f64 {
        if self.even {
            1.0
        } else {
            -1.0
        }
    }

    /// Decompose the permutation into disjoint cycles.
    ///
    /// Fixed points are omitted. Cycles are sorted by descending length,
    /// ties broken by ascending first element.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let n = self.perm.len();
        let mut visited = vec![false; n];
        let mut cycles: Vec<Vec<usize>> = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut cycle = vec![start];
            let mut next = self.perm[start];
            while next != start {
                visited[next] = true;
                cycle.push(next);
                next = self.perm[next];
            }
            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }
        cycles.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        cycles
    }

    /// The permutation's matrix: row `i` has its 1 in column `perm[i]`.
    pub fn matrix(&self) -> Result<DenseMatrix> {
        let n = self.perm.len();
        let mut result = DenseMatrix::zeros(n, n)?;
        for i in 0..n {
            result.set(i, self.perm[i], 1.0);
        }
        Ok(result)
    }

    /// Exchange the targets of `i` and `j`, flipping parity.
    ///
    /// Equivalent to composing with the transposition `(i j)`. A no-op
    /// when `i == j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.perm.swap(i, j);
        self.even = !self.even;
    }

    /// Apply the permutation to a vector, returning a new vector with
    /// `result[i] = vector[perm[i]]`.
    pub fn apply(&self, vector: &[f64]) -> Result<Vec<f64>> {
        let n = self.perm.len();
        if vector.len() != n {
            return Err(Error::WrongVectorLength {
                expected: n,
                got: vector.len(),
            });
        }
        Ok(self.perm.iter().map(|&p| vector[p]).collect())
    }

    /// Apply the permutation to `src`, writing into `dest`.
    pub fn apply_into(&self, src: &[f64], dest: &mut [f64]) -> Result<()> {
        let n = self.perm.len();
        if src.len() != n || dest.len() != n {
            return Err(Error::WrongVectorLength {
                expected: n,
                got: src.len().min(dest.len()),
            });
        }
        for (d, &p) in dest.iter_mut().zip(self.perm.iter()) {
            *d = src[p];
        }
        Ok(())
    }

    /// Apply the permutation to a vector in place, through a temporary
    /// buffer.
    pub fn apply_in_place(&self, vector: &mut [f64]) -> Result<()> {
        let permuted = self.apply(vector)?;
        vector.copy_from_slice(&permuted);
        Ok(())
    }

    /// Permute the rows of a matrix: the result is `P * a`.
    pub fn apply_rows(&self, a: &DenseMatrix) -> Result<DenseMatrix> {
        let mut result = DenseMatrix::zeros(a.rows(), a.cols())?;
        self.apply_rows_into(a, &mut result)?;
        Ok(result)
    }

    /// Permute the rows of `src` into `dest`.
    pub fn apply_rows_into(&self, src: &DenseMatrix, dest: &mut DenseMatrix) -> Result<()> {
        let n = self.perm.len();
        if src.rows() != n || dest.rows() != n || src.cols() != dest.cols() {
            return Err(Error::DimensionMismatch {
                lhs_rows: src.rows(),
                lhs_cols: src.cols(),
                rhs_rows: dest.rows(),
                rhs_cols: dest.cols(),
            });
        }
        let cols = src.cols();
        for i in 0..n {
            let source_row = self.perm[i];
            for j in 0..cols {
                dest.set(i, j, src.get(source_row, j));
            }
        }
        Ok(())
    }

    /// Left-multiply the permutation's matrix by `a`, computing `a * P`.
    ///
    /// This permutes the columns of `a` by the inverse permutation, using
    /// `AP = (P^-1 A^T)^T`.
    pub fn left_multiply_by(&self, a: &DenseMatrix) -> Result<DenseMatrix> {
        let mut workspace = a.transpose();
        let mut result = DenseMatrix::zeros(a.rows(), a.cols())?;
        self.left_multiply_by_into(a, &mut result, &mut workspace)?;
        Ok(result)
    }

    /// Left-multiply into a caller-provided result, using `workspace`
    /// (shaped as the transpose of `a`) to avoid allocation.
    pub fn left_multiply_by_into(
        &self,
        a: &DenseMatrix,
        result: &mut DenseMatrix,
        workspace: &mut DenseMatrix,
    ) -> Result<()> {
        if result.rows() != a.rows() || result.cols() != a.cols() {
            return Err(Error::DimensionMismatch {
                lhs_rows: a.rows(),
                lhs_cols: a.cols(),
                rhs_rows: result.rows(),
                rhs_cols: result.cols(),
            });
        }
        if workspace.rows() != a.cols() || workspace.cols() != a.rows() {
            return Err(Error::DimensionMismatch {
                lhs_rows: a.cols(),
                lhs_cols: a.rows(),
                rhs_rows: workspace.rows(),
                rhs_cols: workspace.cols(),
            });
        }
        for i in 0..workspace.rows() {
            for j in 0..workspace.cols() {
                workspace.set(i, j, a.get(j, i));
            }
        }
        // Transpose back while permuting the transpose's rows by the
        // inverse, so no intermediate matrix is needed.
        let inverse = self.inverse();
        let inv = inverse.vector();
        for i in 0..result.rows() {
            for j in 0..result.cols() {
                result.set(i, j, workspace.get(inv[j], i));
            }
        }
        Ok(())
    }

    /// Apply this permutation to another, composing them.
    ///
    /// The result's vector is this permutation applied to `other`'s
    /// vector; the parity is the XOR of both parities, so no cycle walk
    /// is needed.
    pub fn compose(&self, other: &Permutation) -> Result<Permutation> {
        if self.perm.len() != other.perm.len() {
            return Err(Error::IncompatiblePermutations {
                lhs: self.perm.len(),
                rhs: other.perm.len(),
            });
        }
        let perm = self.perm.iter().map(|&p| other.perm[p]).collect();
        Ok(Permutation {
            perm,
            even: self.even == other.even,
        })
    }

    /// The inverse permutation, satisfying
    /// `p.inverse().apply(&p.apply(&v)?)? == v`. The inverse has the same
    /// parity as the original.
    pub fn inverse(&self) -> Permutation {
        let mut result = vec![0usize; self.perm.len()];
        for (i, &p) in self.perm.iter().enumerate() {
            result[p] = i;
        }
        Permutation {
            perm: result,
            even: self.even,
        }
    }
}
