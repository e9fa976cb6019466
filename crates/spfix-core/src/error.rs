//! Error types for shape partitioning and nse validation
//!
//! All of them are raised before any randomness is consumed, so a failed
//! call never touches its key.
//!
//! # Examples
//!
//! ```
//! use spfix_core::{ShapeError, ShapePartition};
//!
//! let err = ShapePartition::new(&[3, 4], 2, 1).unwrap_err();
//! assert!(matches!(err, ShapeError::InvalidPartition { .. }));
//! ```

use thiserror::Error;

/// Errors raised while splitting a shape or resolving nse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Invalid n_batch={n_batch}, n_dense={n_dense} for shape={shape:?}")]
    InvalidPartition {
        n_batch: usize,
        n_dense: usize,
        shape: Vec<usize>,
    },

    #[error("got nse={nse}, expected to be between 0 and {sparse_size}")]
    InvalidNse { nse: String, sparse_size: usize },

    #[error("Element count of shape={shape:?} overflows usize")]
    SizeOverflow { shape: Vec<usize> },
}

/// Result type alias for shape operations
pub type ShapeResult<T> = Result<T, ShapeError>;
