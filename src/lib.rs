//! # factr
//!
//! **Dense matrix factorizations for Rust: LU, Cholesky, and Householder QR.**
//!
//! factr computes numerically stable decompositions of dense f64 matrices
//! and reuses them to solve linear systems, compute determinants and
//! inverses, and test singularity - without re-deriving the factorization.
//!
//! ## Why factr?
//!
//! - **Correct pivoting**: LU selects pivots from the partially eliminated
//!   column, not the original matrix, so elimination never divides by a
//!   pivot that a row exchange could have avoided
//! - **Compensated summation**: Kahan and pairwise accumulators keep inner
//!   products accurate where cancellation would otherwise dominate
//! - **Compact storage**: L and U (or the Householder vectors and R) share
//!   one rectangular buffer; callers can hand over their own buffer to
//!   factor in place
//! - **Eager validation**: malformed shapes fail before any numerical work,
//!   never after partial mutation
//!
//! This is a classical O(n^3) dense textbook implementation, not a BLAS
//! replacement: no sparse formats, no iterative solvers, no blocking.
//!
//! ## Quick Start
//!
//! ```
//! use factr::prelude::*;
//!
//! # fn main() -> factr::error::Result<()> {
//! let a = DenseMatrix::from_rows(&[vec![2.0, 1.0], vec![4.0, 3.0]])?;
//! let lu = LuDecomposition::new(&a);
//!
//! let x = lu.solve(&[1.0, 1.0])?;
//! assert!((x[0] - 1.0).abs() < 1e-12 && (x[1] + 1.0).abs() < 1e-12);
//!
//! let det = lu.det()?;
//! assert!((det - 2.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accum;
pub mod decomp;
pub mod error;
pub mod matrix;
pub mod permutation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::accum::{Accumulator, KahanSum, PairwiseSum};
    pub use crate::decomp::{
        CholeskyDecomposition, LuDecomposition, QrDecomposition, TriangularDecomposition,
    };
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{DenseMatrix, MajorOrder};
    pub use crate::permutation::Permutation;
}
