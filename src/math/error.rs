use std::fmt;

/// Shape errors raised by `Matrix` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Elementwise operation on matrices of different shapes.
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// `dot` where `left.cols != right.rows`.
    IncompatibleDot {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Supplied buffer length does not equal `rows * cols`.
    LengthMismatch {
        rows: usize,
        cols: usize,
        len: usize,
    },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::ShapeMismatch { op, left, right } => write!(
                f,
                "shape mismatch in {}: {}x{} vs {}x{}",
                op, left.0, left.1, right.0, right.1
            ),
            MatrixError::IncompatibleDot { left, right } => write!(
                f,
                "incompatible dimensions for matrix product: {}x{} · {}x{}",
                left.0, left.1, right.0, right.1
            ),
            MatrixError::LengthMismatch { rows, cols, len } => write!(
                f,
                "expected {} values for a {}x{} matrix, got {}",
                rows * cols, rows, cols, len
            ),
        }
    }
}

impl std::error::Error for MatrixError {}
