//! Sparse coordinate sampling
//!
//! Sampling happens in two layers:
//!
//! - [`sample_indices`] draws `nse` coordinates for a single batch element
//!   from its own key, with or without replacement.
//! - [`sample_batched`] runs it once per batch element and stacks the tables
//!   into a `batch_shape + (nse, n_sparse)` tensor.
//!
//! [`split_streams`] derives the keys: one for the value generator and one per
//! batch element, in row-major batch order. Batch elements share nothing, so
//! with the `parallel` feature they are sampled on the rayon pool; the result
//! is identical to the sequential path because key `i` always goes to
//! element `i`.
//!
//! # Examples
//!
//! ```
//! use spfix_core::{PrngKey, ShapePartition};
//! use spfix_sparse::sampler::{sample_batched, split_streams};
//!
//! let part = ShapePartition::new(&[3, 4, 5], 1, 0).unwrap();
//! let streams = split_streams(PrngKey::new(0), part.batch_size()).unwrap();
//! let indices = sample_batched(streams.index_keys, &part, 6, true).unwrap();
//! assert_eq!(indices.shape(), &[3, 6, 2]);
//! ```

use crate::error::{RandomSparseError, SparseResult};
use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::random::Rng;
use spfix_core::{checked_size, unravel_index, PrngKey, ShapeError, ShapePartition};
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;

/// Indices tensor type: `batch_shape + (nse, n_sparse)`
pub type IndexArray = Array<usize, IxDyn>;

/// Keys derived for one generation call
#[derive(Debug, Clone)]
pub struct BatchStreams {
    /// Key reserved for the value generator
    pub data_key: PrngKey,
    /// One key per batch element, in row-major batch order
    pub index_keys: Vec<PrngKey>,
}

/// Split `key` into `batch_size + 1` substreams
///
/// Substream 0 feeds the value generator; substream `i + 1` feeds batch
/// element `i`.
///
/// # Errors
///
/// [`ShapeError::SizeOverflow`] if `batch_size + 1` does not fit in `usize`.
pub fn split_streams(key: PrngKey, batch_size: usize) -> SparseResult<BatchStreams> {
    let num = batch_size
        .checked_add(1)
        .ok_or_else(|| ShapeError::SizeOverflow {
            shape: vec![batch_size],
        })?;
    let mut index_keys = key.split(num);
    let data_key = index_keys.remove(0);
    Ok(BatchStreams {
        data_key,
        index_keys,
    })
}

/// Sample `nse` coordinates over `sparse_shape` for one batch element
///
/// Returns a flat row-major `(nse, n_sparse)` table. With no sparse axes the
/// table is empty and the key is not drawn from.
///
/// # Errors
///
/// - [`RandomSparseError::SampleSizeExceeded`] when `unique` is set and `nse`
///   exceeds the number of sparse positions, or when positions are requested
///   from an empty sparse space
/// - [`ShapeError::SizeOverflow`] when the sparse capacity or the
///   `(nse, n_sparse)` table size does not fit in `usize`
pub fn sample_indices(
    key: PrngKey,
    sparse_shape: &[usize],
    nse: usize,
    unique: bool,
) -> SparseResult<Vec<usize>> {
    if sparse_shape.is_empty() {
        return Ok(Vec::new());
    }

    let sparse_size = checked_size(sparse_shape)?;
    let table_len = checked_size(&[nse, sparse_shape.len()])?;
    if (unique && nse > sparse_size) || (nse > 0 && sparse_size == 0) {
        return Err(RandomSparseError::sample_size_exceeded(nse, sparse_size));
    }

    let mut rng = key.into_rng();
    let flat = if unique {
        choice_without_replacement(&mut rng, sparse_size, nse)
    } else {
        (0..nse).map(|_| rng.random_range(0..sparse_size)).collect()
    };

    let mut table = Vec::with_capacity(table_len);
    for position in flat {
        table.extend_from_slice(&unravel_index(position, sparse_shape));
    }
    Ok(table)
}

/// Draw `k` distinct values from `0..n` in random order
///
/// Partial Fisher-Yates over a virtual `0..n` array; only swapped slots are
/// stored, so memory is O(k) regardless of `n`.
fn choice_without_replacement<R: Rng>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    let mut swapped: HashMap<usize, usize> = HashMap::with_capacity(k);
    let mut out = Vec::with_capacity(k);
    for i in 0..k {
        let j = rng.random_range(i..n);
        let at_j = swapped.get(&j).copied().unwrap_or(j);
        let at_i = swapped.get(&i).copied().unwrap_or(i);
        swapped.insert(j, at_i);
        out.push(at_j);
    }
    out
}

/// Sample every batch element and stack into a `batch_shape + (nse, n_sparse)` tensor
///
/// `index_keys` must hold exactly one key per batch element.
pub fn sample_batched(
    index_keys: Vec<PrngKey>,
    partition: &ShapePartition,
    nse: usize,
    unique: bool,
) -> SparseResult<IndexArray> {
    let indices_shape = partition.indices_shape(nse);
    if index_keys.len() != partition.batch_size() {
        return Err(RandomSparseError::layout(
            format!(
                "expected {} index keys, got {}",
                partition.batch_size(),
                index_keys.len()
            ),
            &[],
            &indices_shape,
            &partition.full_shape(),
        ));
    }

    let sparse_shape = partition.sparse_shape();

    #[cfg(feature = "parallel")]
    let tables: Vec<Vec<usize>> = index_keys
        .into_par_iter()
        .map(|key| sample_indices(key, sparse_shape, nse, unique))
        .collect::<SparseResult<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let tables: Vec<Vec<usize>> = index_keys
        .into_iter()
        .map(|key| sample_indices(key, sparse_shape, nse, unique))
        .collect::<SparseResult<_>>()?;

    tracing::trace!(
        batch_size = tables.len(),
        nse,
        n_sparse = partition.n_sparse(),
        unique,
        "sampled sparse coordinates"
    );

    let flat: Vec<usize> = tables.into_iter().flatten().collect();
    let got = flat.len();
    Array::from_shape_vec(IxDyn(&indices_shape), flat).map_err(|_| {
        RandomSparseError::layout(
            format!("sampled {} index components", got),
            &[],
            &indices_shape,
            &partition.full_shape(),
        )
    })
}
