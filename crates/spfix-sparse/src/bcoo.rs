//! BCOO (batched coordinate) sparse arrays
//!
//! A BCOO array stores, for every batch element, `nse` coordinates over the
//! sparse axes together with a dense block of values per coordinate.
//!
//! # Format
//!
//! For a shape partitioned as `batch_shape | sparse_shape | dense_shape`:
//! - `data`: `batch_shape + (nse,) + dense_shape` values
//! - `indices`: `batch_shape + (nse, n_sparse)` coordinates; row
//!   `indices[b, j, :]` locates `data[b, j, ...]` within the sparse axes
//! - `shape`: the full logical shape
//!
//! The partition is not stored; it is recovered from the tensors:
//! `n_batch = indices.ndim - 2`, `n_sparse = indices.shape[-1]`,
//! `n_dense = data.ndim - 1 - n_batch`.
//!
//! # Examples
//!
//! ```
//! use scirs2_core::ndarray_ext::{Array, IxDyn};
//! use spfix_sparse::bcoo::BcooArray;
//!
//! // 3x4 matrix with entries at (0, 1) and (2, 3)
//! let data = Array::from_shape_vec(IxDyn(&[2]), vec![2.5, 1.0]).unwrap();
//! let indices = Array::from_shape_vec(IxDyn(&[2, 2]), vec![0, 1, 2, 3]).unwrap();
//!
//! let bcoo = BcooArray::new(data, indices, vec![3, 4]).unwrap();
//! assert_eq!(bcoo.nse(), 2);
//! assert_eq!(bcoo.n_sparse(), 2);
//! assert!(bcoo.has_unique_indices());
//! ```

use crate::error::{RandomSparseError, ShapeMismatchError, SparseResult};
use crate::sampler::IndexArray;
use scirs2_core::ndarray_ext::{Array, Axis, IxDyn};
use spfix_core::ShapePartition;
use std::borrow::Cow;
use std::collections::HashSet;

/// Batched-COO sparse array
///
/// Immutable once built; all constructors validate the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BcooArray<T> {
    data: Array<T, IxDyn>,
    indices: IndexArray,
    shape: Vec<usize>,
}

impl<T> BcooArray<T> {
    /// Create a BCOO array from its parts
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `indices` has fewer than two axes
    /// - data and indices disagree on the batch axes or on nse
    /// - the batch, sparse and dense axes do not add up to `shape`
    /// - the dense axes of `data` differ from the tail of `shape`
    /// - any coordinate is outside the sparse axes
    pub fn new(data: Array<T, IxDyn>, indices: IndexArray, shape: Vec<usize>) -> SparseResult<Self> {
        let data_shape = data.shape().to_vec();
        let idx_shape = indices.shape().to_vec();
        let layout = |reason: &str| RandomSparseError::layout(reason, &data_shape, &idx_shape, &shape);

        if idx_shape.len() < 2 {
            return Err(layout("indices must have at least 2 axes"));
        }
        let n_batch = idx_shape.len() - 2;
        let nse = idx_shape[n_batch];
        let n_sparse = idx_shape[n_batch + 1];

        if data_shape.len() < n_batch + 1 {
            return Err(layout("data has fewer axes than batch axes + nse"));
        }
        let n_dense = data_shape.len() - n_batch - 1;

        if n_batch + n_sparse + n_dense != shape.len() {
            return Err(layout("batch, sparse and dense axes do not add up to shape"));
        }
        if data_shape[..n_batch] != idx_shape[..n_batch] || idx_shape[..n_batch] != shape[..n_batch] {
            return Err(layout("batch axes disagree"));
        }
        if data_shape[n_batch] != nse {
            return Err(layout("data and indices disagree on nse"));
        }
        if data_shape[n_batch + 1..] != shape[n_batch + n_sparse..] {
            return Err(layout("dense axes disagree"));
        }

        let sparse_shape = &shape[n_batch..n_batch + n_sparse];
        if n_sparse > 0 {
            for row in indices.lanes(Axis(n_batch + 1)) {
                if row.iter().zip(sparse_shape).any(|(&c, &size)| c >= size) {
                    return Err(RandomSparseError::index_out_of_bounds(
                        row.to_vec(),
                        sparse_shape.to_vec(),
                    ));
                }
            }
        }

        Ok(Self {
            data,
            indices,
            shape,
        })
    }

    pub fn data(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    pub fn indices(&self) -> &IndexArray {
        &self.indices
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Consume into `(data, indices, shape)`
    pub fn into_parts(self) -> (Array<T, IxDyn>, IndexArray, Vec<usize>) {
        (self.data, self.indices, self.shape)
    }

    pub fn n_batch(&self) -> usize {
        self.indices.ndim() - 2
    }

    pub fn n_sparse(&self) -> usize {
        self.indices.shape()[self.indices.ndim() - 1]
    }

    pub fn n_dense(&self) -> usize {
        self.data.ndim() - 1 - self.n_batch()
    }

    /// Number of specified entries per batch element
    pub fn nse(&self) -> usize {
        self.indices.shape()[self.n_batch()]
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.shape[..self.n_batch()]
    }

    pub fn sparse_shape(&self) -> &[usize] {
        &self.shape[self.n_batch()..self.n_batch() + self.n_sparse()]
    }

    pub fn dense_shape(&self) -> &[usize] {
        &self.shape[self.n_batch() + self.n_sparse()..]
    }

    /// Number of batch elements
    pub fn batch_size(&self) -> usize {
        self.batch_shape().iter().product()
    }

    /// Fraction of sparse positions specified per batch element
    pub fn density(&self) -> f64 {
        let capacity: f64 = self.sparse_shape().iter().map(|&d| d as f64).product();
        if capacity == 0.0 {
            return 0.0;
        }
        self.nse() as f64 / capacity
    }

    /// Coordinate rows of batch element `batch` (row-major batch order)
    ///
    /// Returns `None` if `batch` is out of range.
    pub fn batch_rows(&self, batch: usize) -> Option<Vec<Vec<usize>>> {
        if batch >= self.batch_size() {
            return None;
        }
        let flat = self.flat_indices();
        let rows = self
            .batch_tables(&flat)
            .nth(batch)?
            .map(<[usize]>::to_vec)
            .collect();
        Some(rows)
    }

    /// Whether every batch element's coordinate rows are pairwise distinct
    pub fn has_unique_indices(&self) -> bool {
        let flat = self.flat_indices();
        let unique = self.batch_tables(&flat).all(|rows| {
            let mut seen = HashSet::with_capacity(self.nse());
            rows.into_iter().all(|row| seen.insert(row))
        });
        unique
    }

    /// Indices in row-major order, borrowed when already contiguous
    fn flat_indices(&self) -> Cow<'_, [usize]> {
        match self.indices.as_slice() {
            Some(flat) => Cow::Borrowed(flat),
            None => Cow::Owned(self.indices.iter().copied().collect()),
        }
    }

    /// One iterator of `nse` coordinate rows per batch element
    fn batch_tables<'a>(
        &self,
        flat: &'a [usize],
    ) -> impl Iterator<Item = impl Iterator<Item = &'a [usize]> + 'a> + 'a {
        let (nse, n_sparse) = (self.nse(), self.n_sparse());
        let table = nse * n_sparse;
        (0..self.batch_size()).map(move |b| {
            (0..nse).map(move |j| {
                let at = b * table + j * n_sparse;
                &flat[at..at + n_sparse]
            })
        })
    }
}

/// Combine sampled indices and generated data into a [`BcooArray`]
///
/// Both tensors are checked against the layout `partition` and `nse` imply
/// before the structural checks of [`BcooArray::new`].
pub fn assemble<T>(
    partition: &ShapePartition,
    nse: usize,
    data: Array<T, IxDyn>,
    indices: IndexArray,
) -> SparseResult<BcooArray<T>> {
    let expected_data = partition.data_shape(nse);
    if data.shape() != expected_data.as_slice() {
        return Err(ShapeMismatchError::Data {
            expected: expected_data,
            got: data.shape().to_vec(),
        }
        .into());
    }

    let expected_indices = partition.indices_shape(nse);
    if indices.shape() != expected_indices.as_slice() {
        return Err(ShapeMismatchError::Indices {
            expected: expected_indices,
            got: indices.shape().to_vec(),
        }
        .into());
    }

    BcooArray::new(data, indices, partition.full_shape())
}
