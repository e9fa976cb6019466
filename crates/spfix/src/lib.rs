//! # spfix - Random Sparse Tensor Fixtures
//!
//! Deterministic random sparse arrays in batched-COO (BCOO) layout, for
//! testing and benchmarking sparse kernels.
//!
//! This is the **meta crate** that re-exports the spfix components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use spfix::prelude::*;
//!
//! // A 10x10 matrix with 20% of its entries specified
//! let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[10, 10], &RandomBcooConfig::new())?;
//! assert_eq!(bcoo.indices().shape(), &[20, 2]);
//! assert_eq!(bcoo.data().shape(), &[20]);
//! # Ok::<(), spfix::sparse::RandomSparseError>(())
//! ```
//!
//! ## Components
//!
//! ### Keys, Shapes and Indices ([`core`])
//!
//! Splittable random keys, batch / sparse / dense shape partitioning, nse
//! resolution and row-major index helpers.
//!
//! ```
//! use spfix::core::{unravel_index, Nse, ShapePartition};
//!
//! let part = ShapePartition::new(&[3, 6, 4, 2], 1, 1).unwrap();
//! assert_eq!(part.sparse_shape(), &[6, 4]);
//! assert_eq!(part.resolve_nse(Nse::Fraction(0.5)).unwrap(), 12);
//! assert_eq!(unravel_index(13, part.sparse_shape()).as_slice(), &[3, 1]);
//! ```
//!
//! ### Random BCOO Arrays ([`sparse`])
//!
//! The generator, value strategies and the validated [`BcooArray`](sparse::BcooArray)
//! container.
//!
//! ```
//! use spfix::core::PrngKey;
//! use spfix::sparse::{random_bcoo_with, Normal, RandomBcooConfig};
//!
//! let config = RandomBcooConfig::new()
//!     .with_nse(3usize)
//!     .with_n_batch(1)
//!     .with_option("std", 0.5);
//! let bcoo = random_bcoo_with::<f32, _>(PrngKey::new(9), &[2, 4, 4], &config, &Normal).unwrap();
//! assert_eq!(bcoo.indices().shape(), &[2, 3, 2]);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): sample batch elements on the rayon pool
//! - `serde`: serialize keys and generator configurations
//! - `tracing`: install a `tracing-subscriber` via
//!   [`sparse::tracing_support::init_tracing`]

#![deny(warnings)]

// Re-export all components
pub use spfix_core as core;
pub use spfix_sparse as sparse;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use spfix::prelude::*;
    //!
    //! let config = RandomBcooConfig::new().with_nse(Nse::Count(4));
    //! let bcoo = random_bcoo::<f64>(PrngKey::new(1), &[3, 3], &config).unwrap();
    //! assert!(bcoo.has_unique_indices());
    //! ```

    // Keys and shapes
    pub use crate::core::{Nse, PrngKey, ShapePartition};

    // Generation
    pub use crate::sparse::{
        random_bcoo, random_bcoo_with, BcooArray, GeneratorOptions, Normal, RandomBcooConfig,
        Uniform, ValueGenerator,
    };

    // Errors
    pub use crate::core::ShapeError;
    pub use crate::sparse::RandomSparseError;
}
