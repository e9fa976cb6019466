//! Unified error types for random sparse array generation
//!
//! # Design
//!
//! - **`RandomSparseError`**: top-level enum returned by every public entry point
//! - **`ShapeError`** (from `spfix-core`): invalid partition or nse, raised
//!   before any randomness is consumed
//! - **`ShapeMismatchError`**: tensors that disagree with the declared layout
//! - **Generator errors**: whatever a [`ValueGenerator`](crate::ValueGenerator)
//!   reports, carried as `anyhow::Error`
//!
//! # Examples
//!
//! ```
//! use spfix_core::ShapeError;
//! use spfix_sparse::error::RandomSparseError;
//!
//! let err: RandomSparseError = ShapeError::InvalidNse {
//!     nse: "16".to_string(),
//!     sparse_size: 16,
//! }
//! .into();
//! assert!(matches!(err, RandomSparseError::Shape(ShapeError::InvalidNse { .. })));
//! ```

use spfix_core::ShapeError;
use thiserror::Error;

/// Top-level error type for random sparse array generation
#[derive(Error, Debug)]
pub enum RandomSparseError {
    /// Invalid partition or nse
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Unique sampling asked for more positions than exist
    #[error("Cannot sample {requested} positions from {available} available")]
    SampleSizeExceeded { requested: usize, available: usize },

    /// A tensor does not match the declared layout
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),

    /// A sampled coordinate falls outside the sparse axes
    #[error("Index out of bounds: index {index:?} exceeds sparse shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// The value generator failed
    #[error("Value generator failed: {0}")]
    Generator(#[from] anyhow::Error),
}

/// Layout disagreements between data, indices and the array shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeMismatchError {
    #[error("data tensor: expected {expected:?}, got {got:?}")]
    Data {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("indices tensor: expected {expected:?}, got {got:?}")]
    Indices {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("{reason} (data {data:?}, indices {indices:?}, shape {shape:?})")]
    Layout {
        reason: String,
        data: Vec<usize>,
        indices: Vec<usize>,
        shape: Vec<usize>,
    },
}

/// Result type alias for random sparse generation
pub type SparseResult<T> = Result<T, RandomSparseError>;

impl RandomSparseError {
    /// Create a sample size error
    pub fn sample_size_exceeded(requested: usize, available: usize) -> Self {
        RandomSparseError::SampleSizeExceeded {
            requested,
            available,
        }
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: Vec<usize>, shape: Vec<usize>) -> Self {
        RandomSparseError::IndexOutOfBounds { index, shape }
    }

    /// Create a layout mismatch error
    pub fn layout(
        reason: impl Into<String>,
        data: &[usize],
        indices: &[usize],
        shape: &[usize],
    ) -> Self {
        RandomSparseError::ShapeMismatch(ShapeMismatchError::Layout {
            reason: reason.into(),
            data: data.to_vec(),
            indices: indices.to_vec(),
            shape: shape.to_vec(),
        })
    }
}
