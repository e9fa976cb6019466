//! Random BCOO array generation
//!
//! [`random_bcoo`] builds a random sparse array for tests and benchmarks:
//!
//! 1. Partition `shape` into batch / sparse / dense axes and resolve nse
//!    (both checked before the key is touched)
//! 2. Split the key into one data key and one key per batch element
//! 3. Sample coordinates per batch element and generate the values
//! 4. Assemble and validate the [`BcooArray`]
//!
//! # Examples
//!
//! ```
//! use spfix_core::PrngKey;
//! use spfix_sparse::random::{random_bcoo, RandomBcooConfig};
//!
//! // 4 independent 10x10 matrices with 3 dense channels per entry
//! let config = RandomBcooConfig::new().with_nse(0.1).with_n_batch(1).with_n_dense(1);
//! let bcoo = random_bcoo::<f32>(PrngKey::new(0), &[4, 10, 10, 3], &config).unwrap();
//!
//! assert_eq!(bcoo.indices().shape(), &[4, 10, 2]);
//! assert_eq!(bcoo.data().shape(), &[4, 10, 3]);
//! assert!(bcoo.has_unique_indices());
//! ```

use crate::bcoo::{assemble, BcooArray};
use crate::error::SparseResult;
use crate::generator::{GeneratorOptions, OptionValue, Uniform, ValueGenerator};
use crate::sampler::{sample_batched, split_streams};
use scirs2_core::numeric::Float;
use spfix_core::{checked_size, Nse, PrngKey, ShapePartition};

/// Parameters of a random BCOO array
///
/// Defaults: 20% density, no batch or dense axes, unique indices, no
/// generator options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RandomBcooConfig {
    /// Specified entries per batch element, as a count or a fraction
    pub nse: Nse,
    /// Number of leading batch axes
    pub n_batch: usize,
    /// Number of trailing dense axes
    pub n_dense: usize,
    /// Sample coordinates without replacement within each batch element
    pub unique_indices: bool,
    /// Options forwarded to the value generator
    pub generator_options: GeneratorOptions,
}

impl Default for RandomBcooConfig {
    fn default() -> Self {
        Self {
            nse: Nse::default(),
            n_batch: 0,
            n_dense: 0,
            unique_indices: true,
            generator_options: GeneratorOptions::new(),
        }
    }
}

impl RandomBcooConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nse(mut self, nse: impl Into<Nse>) -> Self {
        self.nse = nse.into();
        self
    }

    pub fn with_n_batch(mut self, n_batch: usize) -> Self {
        self.n_batch = n_batch;
        self
    }

    pub fn with_n_dense(mut self, n_dense: usize) -> Self {
        self.n_dense = n_dense;
        self
    }

    pub fn with_unique_indices(mut self, unique: bool) -> Self {
        self.unique_indices = unique;
        self
    }

    /// Add one generator option
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.generator_options.insert(name, value);
        self
    }

    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator_options = options;
        self
    }
}

/// Generate a random BCOO array with uniformly distributed values
///
/// Values are drawn from `[minval, maxval)` (generator options, default
/// `[0, 1)`). See [`random_bcoo_with`] for custom generators.
///
/// # Errors
///
/// - [`ShapeError::InvalidPartition`](spfix_core::ShapeError::InvalidPartition)
///   if `n_batch + n_dense > shape.len()`
/// - [`ShapeError::InvalidNse`](spfix_core::ShapeError::InvalidNse) unless
///   `0 <= nse < product(sparse_shape)`
/// - [`ShapeError::SizeOverflow`](spfix_core::ShapeError::SizeOverflow) if
///   the sparse capacity, batch count or output tensors overflow `usize`
/// - [`RandomSparseError::Generator`](crate::RandomSparseError::Generator)
///   for invalid generator options
pub fn random_bcoo<T>(
    key: PrngKey,
    shape: &[usize],
    config: &RandomBcooConfig,
) -> SparseResult<BcooArray<T>>
where
    T: Float,
{
    random_bcoo_with(key, shape, config, &Uniform)
}

/// Generate a random BCOO array with values from `generator`
///
/// For a fixed key and configuration the result is bit-identical across
/// calls, with or without the `parallel` feature.
#[tracing::instrument(
    level = "debug",
    skip(key, config, generator),
    fields(nse = %config.nse, n_batch = config.n_batch, n_dense = config.n_dense)
)]
pub fn random_bcoo_with<T, G>(
    key: PrngKey,
    shape: &[usize],
    config: &RandomBcooConfig,
    generator: &G,
) -> SparseResult<BcooArray<T>>
where
    G: ValueGenerator<T> + ?Sized,
{
    let partition = ShapePartition::new(shape, config.n_batch, config.n_dense)?;
    let nse = partition.resolve_nse(config.nse)?;

    tracing::debug!(
        batch_shape = ?partition.batch_shape(),
        sparse_shape = ?partition.sparse_shape(),
        dense_shape = ?partition.dense_shape(),
        nse,
        unique = config.unique_indices,
        "partitioned shape"
    );

    let data_shape = partition.data_shape(nse);
    checked_size(&data_shape)?;
    checked_size(&partition.indices_shape(nse))?;

    let streams = split_streams(key, partition.batch_size())?;

    let data = generator.generate(streams.data_key, &data_shape, &config.generator_options)?;
    let indices = sample_batched(streams.index_keys, &partition, nse, config.unique_indices)?;

    assemble(&partition, nse, data, indices)
}
