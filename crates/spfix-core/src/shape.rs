//! Shape partitioning and nse resolution
//!
//! A batched-COO array splits its axes, in order, into batch axes, sparse
//! axes and dense axes:
//!
//! ```text
//! shape = [ b₀ … b_{n_batch-1} | s₀ … s_{n_sparse-1} | d₀ … d_{n_dense-1} ]
//! ```
//!
//! Specified entries are sampled over the sparse axes independently for each
//! batch element; dense axes are fully materialized per entry.
//!
//! # Examples
//!
//! ```
//! use spfix_core::{Nse, ShapePartition};
//!
//! let part = ShapePartition::new(&[2, 10, 3], 1, 1).unwrap();
//! assert_eq!(part.batch_shape(), &[2]);
//! assert_eq!(part.sparse_shape(), &[10]);
//! assert_eq!(part.dense_shape(), &[3]);
//!
//! let nse = part.resolve_nse(Nse::Fraction(0.5)).unwrap();
//! assert_eq!(nse, 5);
//! assert_eq!(part.indices_shape(nse), vec![2, 5, 1]);
//! assert_eq!(part.data_shape(nse), vec![2, 5, 3]);
//! ```

use crate::error::{ShapeError, ShapeResult};
use smallvec::SmallVec;
use std::fmt;

/// Shape type with inline storage for the common low-rank case
pub type Shape = SmallVec<[usize; 6]>;

/// Ordered split of a full shape into batch, sparse and dense axes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapePartition {
    batch: Shape,
    sparse: Shape,
    dense: Shape,
    batch_size: usize,
    sparse_size: usize,
}

impl ShapePartition {
    /// Split `shape` into the first `n_batch` axes, the trailing `n_dense`
    /// axes, and the sparse axes in between
    ///
    /// # Errors
    ///
    /// - [`ShapeError::InvalidPartition`] if `n_batch + n_dense` exceeds the
    ///   number of axes
    /// - [`ShapeError::SizeOverflow`] if the batch or sparse element count
    ///   does not fit in `usize`
    pub fn new(shape: &[usize], n_batch: usize, n_dense: usize) -> ShapeResult<Self> {
        let n_sparse = n_batch
            .checked_add(n_dense)
            .and_then(|fixed| shape.len().checked_sub(fixed))
            .ok_or_else(|| ShapeError::InvalidPartition {
                n_batch,
                n_dense,
                shape: shape.to_vec(),
            })?;

        let (batch, rest) = shape.split_at(n_batch);
        let (sparse, dense) = rest.split_at(n_sparse);

        Ok(Self {
            batch: Shape::from_slice(batch),
            sparse: Shape::from_slice(sparse),
            dense: Shape::from_slice(dense),
            batch_size: checked_size(batch)?,
            sparse_size: checked_size(sparse)?,
        })
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.batch
    }

    pub fn sparse_shape(&self) -> &[usize] {
        &self.sparse
    }

    pub fn dense_shape(&self) -> &[usize] {
        &self.dense
    }

    pub fn n_batch(&self) -> usize {
        self.batch.len()
    }

    pub fn n_sparse(&self) -> usize {
        self.sparse.len()
    }

    pub fn n_dense(&self) -> usize {
        self.dense.len()
    }

    /// Number of batch elements (1 when there are no batch axes)
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of positions spanned by the sparse axes (1 when there are none)
    pub fn sparse_size(&self) -> usize {
        self.sparse_size
    }

    /// Concatenation of the three sub-shapes
    pub fn full_shape(&self) -> Vec<usize> {
        self.batch
            .iter()
            .chain(&self.sparse)
            .chain(&self.dense)
            .copied()
            .collect()
    }

    /// Shape of the data tensor: `batch_shape + (nse,) + dense_shape`
    pub fn data_shape(&self, nse: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.n_batch() + 1 + self.n_dense());
        shape.extend_from_slice(&self.batch);
        shape.push(nse);
        shape.extend_from_slice(&self.dense);
        shape
    }

    /// Shape of the indices tensor: `batch_shape + (nse, n_sparse)`
    pub fn indices_shape(&self, nse: usize) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.n_batch() + 2);
        shape.extend_from_slice(&self.batch);
        shape.push(nse);
        shape.push(self.n_sparse());
        shape
    }

    /// Resolve and validate `nse` against this partition's sparse capacity
    pub fn resolve_nse(&self, nse: Nse) -> ShapeResult<usize> {
        nse.resolve(self.sparse_size())
    }
}

/// Requested number of specified entries per batch element
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nse {
    /// Exact count
    Count(usize),
    /// Fraction of the sparse capacity, strictly inside (0, 1)
    Fraction(f64),
}

impl Nse {
    /// Resolve to an entry count and check `0 <= nse < sparse_size`
    ///
    /// A fraction `f` resolves to `ceil(f * sparse_size)`. Note the upper
    /// bound is exclusive: filling every sparse position is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use spfix_core::Nse;
    ///
    /// assert_eq!(Nse::Fraction(0.21).resolve(10).unwrap(), 3);
    /// assert_eq!(Nse::Count(15).resolve(16).unwrap(), 15);
    /// assert!(Nse::Count(16).resolve(16).is_err());
    /// ```
    pub fn resolve(self, sparse_size: usize) -> ShapeResult<usize> {
        let invalid = || ShapeError::InvalidNse {
            nse: self.to_string(),
            sparse_size,
        };

        let count = match self {
            Nse::Count(n) => n,
            Nse::Fraction(f) if f > 0.0 && f < 1.0 => (f * sparse_size as f64).ceil() as usize,
            Nse::Fraction(_) => return Err(invalid()),
        };

        if count < sparse_size {
            Ok(count)
        } else {
            Err(invalid())
        }
    }
}

impl Default for Nse {
    fn default() -> Self {
        Nse::Fraction(0.2)
    }
}

impl From<usize> for Nse {
    fn from(n: usize) -> Self {
        Nse::Count(n)
    }
}

impl From<f64> for Nse {
    fn from(f: f64) -> Self {
        Nse::Fraction(f)
    }
}

impl fmt::Display for Nse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nse::Count(n) => write!(f, "{}", n),
            Nse::Fraction(x) => write!(f, "{}", x),
        }
    }
}

/// Number of elements in `shape`, or [`ShapeError::SizeOverflow`]
///
/// ```
/// use spfix_core::checked_size;
///
/// assert_eq!(checked_size(&[3, 4]).unwrap(), 12);
/// assert_eq!(checked_size(&[]).unwrap(), 1);
/// assert!(checked_size(&[1 << 33, 1 << 33]).is_err());
/// ```
pub fn checked_size(shape: &[usize]) -> ShapeResult<usize> {
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| ShapeError::SizeOverflow {
            shape: shape.to_vec(),
        })
}

/// Convert a flat row-major position into a multi-index over `shape`
///
/// The first axis varies slowest. `flat` must be below `shape.iter().product()`.
///
/// # Examples
///
/// ```
/// use spfix_core::unravel_index;
///
/// assert_eq!(unravel_index(7, &[3, 4]).as_slice(), &[1, 3]);
/// ```
pub fn unravel_index(flat: usize, shape: &[usize]) -> Shape {
    let mut multi = Shape::from_elem(0, shape.len());
    let mut remaining = flat;
    for (dim, &size) in shape.iter().enumerate().rev() {
        multi[dim] = remaining % size;
        remaining /= size;
    }
    multi
}

/// Inverse of [`unravel_index`]
pub fn ravel_index(index: &[usize], shape: &[usize]) -> usize {
    let mut flat = 0;
    let mut stride = 1;
    for (&coord, &size) in index.iter().zip(shape).rev() {
        flat += coord * stride;
        stride *= size;
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_split() {
        let part = ShapePartition::new(&[2, 3, 4, 5, 6], 2, 1).unwrap();
        assert_eq!(part.batch_shape(), &[2, 3]);
        assert_eq!(part.sparse_shape(), &[4, 5]);
        assert_eq!(part.dense_shape(), &[6]);
        assert_eq!(part.n_sparse(), 2);
        assert_eq!(part.full_shape(), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_partition_no_batch_no_dense() {
        let part = ShapePartition::new(&[4, 4], 0, 0).unwrap();
        assert!(part.batch_shape().is_empty());
        assert_eq!(part.batch_size(), 1);
        assert_eq!(part.sparse_size(), 16);
    }

    #[test]
    fn test_partition_all_batch_and_dense() {
        let part = ShapePartition::new(&[3, 2], 1, 1).unwrap();
        assert_eq!(part.n_sparse(), 0);
        assert_eq!(part.sparse_size(), 1);
    }

    #[test]
    fn test_partition_rejects_too_many_axes() {
        let err = ShapePartition::new(&[3, 4], 2, 1).unwrap_err();
        assert_eq!(
            err,
            ShapeError::InvalidPartition {
                n_batch: 2,
                n_dense: 1,
                shape: vec![3, 4],
            }
        );
    }

    #[test]
    fn test_partition_rejects_overflow() {
        let err = ShapePartition::new(&[3], usize::MAX, 1).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidPartition { .. }));
    }

    #[test]
    fn test_partition_rejects_sparse_size_overflow() {
        let err = ShapePartition::new(&[1 << 33, 1 << 33], 0, 0).unwrap_err();
        assert_eq!(
            err,
            ShapeError::SizeOverflow {
                shape: vec![1 << 33, 1 << 33],
            }
        );
    }

    #[test]
    fn test_partition_rejects_batch_size_overflow() {
        let err = ShapePartition::new(&[1 << 33, 1 << 33, 4], 2, 0).unwrap_err();
        assert!(matches!(err, ShapeError::SizeOverflow { .. }));
    }

    #[test]
    fn test_checked_size_zero_axis_wins() {
        assert_eq!(checked_size(&[1 << 33, 1 << 33, 0]).unwrap(), 0);
        assert_eq!(checked_size(&[usize::MAX]).unwrap(), usize::MAX);
    }

    #[test]
    fn test_zero_length_batch_axis() {
        let part = ShapePartition::new(&[0, 5], 1, 0).unwrap();
        assert_eq!(part.batch_size(), 0);
        assert_eq!(part.indices_shape(2), vec![0, 2, 1]);
    }

    #[test]
    fn test_resolve_fraction() {
        assert_eq!(Nse::Fraction(0.5).resolve(10).unwrap(), 5);
        assert_eq!(Nse::Fraction(0.21).resolve(10).unwrap(), 3);
        assert_eq!(Nse::default().resolve(100).unwrap(), 20);
    }

    #[test]
    fn test_resolve_count_boundary() {
        assert_eq!(Nse::Count(15).resolve(16).unwrap(), 15);
        assert_eq!(Nse::Count(0).resolve(16).unwrap(), 0);

        // nse == sparse_size is rejected even though it would be a full fill
        let err = Nse::Count(16).resolve(16).unwrap_err();
        assert_eq!(
            err,
            ShapeError::InvalidNse {
                nse: "16".to_string(),
                sparse_size: 16,
            }
        );
    }

    #[test]
    fn test_resolve_rejects_out_of_range_fractions() {
        for f in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            assert!(Nse::Fraction(f).resolve(10).is_err(), "fraction {}", f);
        }
    }

    #[test]
    fn test_resolve_empty_sparse_axes() {
        // With no sparse axes the capacity is 1, so only nse = 0 is valid
        assert_eq!(Nse::Count(0).resolve(1).unwrap(), 0);
        assert!(Nse::Count(1).resolve(1).is_err());
        assert!(Nse::Fraction(0.5).resolve(1).is_err());
    }

    #[test]
    fn test_resolve_zero_capacity() {
        assert!(Nse::Count(0).resolve(0).is_err());
    }

    #[test]
    fn test_unravel_row_major() {
        let shape = [2, 3, 4];
        assert_eq!(unravel_index(0, &shape).as_slice(), &[0, 0, 0]);
        assert_eq!(unravel_index(1, &shape).as_slice(), &[0, 0, 1]);
        assert_eq!(unravel_index(4, &shape).as_slice(), &[0, 1, 0]);
        assert_eq!(unravel_index(23, &shape).as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_ravel_inverts_unravel() {
        let shape = [3, 5, 2];
        for flat in 0..30 {
            assert_eq!(ravel_index(&unravel_index(flat, &shape), &shape), flat);
        }
    }
}
