//! # spfix-sparse
//!
//! Random batched-COO (BCOO) sparse arrays for tests and benchmarks.
//!
//! This crate provides:
//! - [`BcooArray`]: validated batched-coordinate sparse arrays
//! - [`random_bcoo`] / [`random_bcoo_with`]: reproducible random generation
//!   over any split of batch, sparse and dense axes
//! - [`ValueGenerator`]: pluggable value distributions ([`Uniform`], [`Normal`],
//!   or any closure)
//! - Per-batch coordinate sampling with or without replacement
//!
//! ## Quick Start
//!
//! ```
//! use spfix_core::PrngKey;
//! use spfix_sparse::{random_bcoo, RandomBcooConfig};
//!
//! let config = RandomBcooConfig::new().with_nse(5usize);
//! let a = random_bcoo::<f64>(PrngKey::new(42), &[8, 8], &config)?;
//! let b = random_bcoo::<f64>(PrngKey::new(42), &[8, 8], &config)?;
//!
//! assert_eq!(a.indices().shape(), &[5, 2]);
//! assert_eq!(a, b); // same key, same array
//! # Ok::<(), spfix_sparse::RandomSparseError>(())
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): sample batch elements on the rayon pool via scirs2-core
//! - `serde`: serializable configuration and generator options
//! - `tracing`: [`tracing_support::init_tracing`] installs a `tracing-subscriber`

#![deny(warnings)]

pub mod bcoo;
pub mod error;
pub mod generator;
pub mod random;
pub mod sampler;
pub mod tracing_support;

// Re-exports
pub use bcoo::{assemble, BcooArray};
pub use error::{RandomSparseError, ShapeMismatchError, SparseResult};
pub use generator::{GeneratorOptions, Normal, OptionValue, Uniform, ValueGenerator};
pub use random::{random_bcoo, random_bcoo_with, RandomBcooConfig};
pub use sampler::{sample_batched, sample_indices, split_streams, BatchStreams, IndexArray};
