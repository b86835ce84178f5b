//! Error types for vector value coercion.

use thiserror::Error;

/// Result type for lantern operations.
pub type LanternResult<T> = Result<T, LanternError>;

/// Errors raised while coercing values into the database representation.
///
/// These are the only errors this crate originates. Everything else
/// (constraint violations, connection failures, missing extension) is
/// produced by the database or the driver stack and passed through
/// unmodified.
#[derive(Debug, Error)]
pub enum LanternError {
    /// The source array is not one-dimensional.
    #[error("expected a one-dimensional array, got {ndim} dimensions")]
    Shape { ndim: usize },

    /// Vector dimensionality does not match the expected column size.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A textual array element could not be parsed as a number.
    #[error("invalid vector element: {value}")]
    Parse { value: String },
}

impl LanternError {
    /// Creates a shape error.
    pub fn shape(ndim: usize) -> Self {
        Self::Shape { ndim }
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a parse error.
    pub fn parse(value: impl Into<String>) -> Self {
        Self::Parse {
            value: value.into(),
        }
    }
}
