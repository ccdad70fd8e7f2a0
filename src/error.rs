//! Error types for factr

use thiserror::Error;

/// Result type alias using factr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in factr operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A dimension argument was zero
    #[error("Dimension '{arg}' must be positive")]
    ZeroDimension {
        /// The dimension argument name
        arg: &'static str,
    },

    /// Fewer rows were supplied than the stated row count
    #[error("Missing rows: expected {expected}, got {got}")]
    MissingRows {
        /// Stated number of rows
        expected: usize,
        /// Number of rows supplied
        got: usize,
    },

    /// A row has the wrong length for the stated column count
    #[error("Row {row} has wrong size: expected {expected}, got {got}")]
    WrongRowSize {
        /// Index of the offending row
        row: usize,
        /// Required length (exact when strict, minimum otherwise)
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// A flat buffer is too short for the stated dimensions
    #[error("Flat buffer of length {len} too short for a {rows}x{cols} matrix")]
    FlatTooShort {
        /// Buffer length
        len: usize,
        /// Stated number of rows
        rows: usize,
        /// Stated number of columns
        cols: usize,
    },

    /// A vector argument has the wrong length
    #[error("Wrong vector length: expected {expected}, got {got}")]
    WrongVectorLength {
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Operand dimensions are incompatible
    #[error("Dimension mismatch: {lhs_rows}x{lhs_cols} vs {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        /// Left-hand side rows
        lhs_rows: usize,
        /// Left-hand side columns
        lhs_cols: usize,
        /// Right-hand side rows
        rhs_rows: usize,
        /// Right-hand side columns
        rhs_cols: usize,
    },

    /// A [start, end) index pair is inverted or out of range
    #[error("Index range [{start}, {end}) invalid for length {len}")]
    IndexRange {
        /// Start index (inclusive)
        start: usize,
        /// End index (exclusive)
        end: usize,
        /// Length of the indexed slice
        len: usize,
    },

    /// The operation requires a square matrix
    #[error("Operation requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// QR decomposition requires at least as many rows as columns
    #[error("QR decomposition requires rows >= columns, got {rows}x{cols}")]
    NotTall {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// The factored matrix is singular
    #[error("Matrix is singular")]
    Singular,

    /// The factored matrix is rank deficient
    #[error("Matrix is rank deficient")]
    RankDeficient,

    /// Cholesky domain failure: the matrix is not positive definite
    #[error("Matrix is not positive definite: diagonal entry {index} gives radicand {value}")]
    NotPositiveDefinite {
        /// Row index of the failing diagonal entry
        index: usize,
        /// Computed (non-positive) radicand
        value: f64,
    },

    /// A permutation vector entry is outside [0, n)
    #[error("Permutation entry {value} at index {index} out of range for size {size}")]
    PermutationOutOfRange {
        /// Index of the entry
        index: usize,
        /// The offending value
        value: usize,
        /// Size of the permutation
        size: usize,
    },

    /// A permutation target appears more than once
    #[error("Permutation target {value} appears more than once")]
    PermutationDuplicate {
        /// The duplicated value
        value: usize,
    },

    /// A cycle is longer than the permutation it belongs to
    #[error("Cycle of length {len} too long for permutation of size {size}")]
    CycleTooLong {
        /// Length of the cycle
        len: usize,
        /// Size of the permutation
        size: usize,
    },

    /// A matrix is not a 0/1 permutation matrix
    #[error("Matrix is not a permutation matrix: column {index} does not hold a single 1")]
    NotPermutationMatrix {
        /// First column without exactly one 1 entry
        index: usize,
    },

    /// Two permutations have incompatible sizes
    #[error("Incompatible permutation sizes: {lhs} vs {rhs}")]
    IncompatiblePermutations {
        /// Size of the left-hand permutation
        lhs: usize,
        /// Size of the right-hand permutation
        rhs: usize,
    },
}
