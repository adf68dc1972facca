//! Error type shared by the matrix, solver and channel layers.

use thiserror::Error;

/// Failures surfaced by matrix arithmetic and pixel operators.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum AlgebraError {
    /// Operand shapes are incompatible (arithmetic, kernels, transforms).
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Row/column access outside `[0, rows) × [0, cols)`.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The determinant or inverse cannot be computed with the chosen method.
    #[error("matrix is singular")]
    SingularMatrix,

    /// Division by a zero scalar or a degenerate scale factor.
    #[error("division by zero")]
    DivisionByZero,
}

impl AlgebraError {
    pub(crate) fn shape(expected: (usize, usize), actual: (usize, usize)) -> Self {
        AlgebraError::DimensionMismatch {
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

/// Result alias for fallible algebra operations.
pub type Result<T> = std::result::Result<T, AlgebraError>;
