//! # spfix-core
//!
//! Building blocks shared by the spfix fixture generators:
//!
//! - **Random keys** ([`PrngKey`]): explicit, splittable random-stream handles
//! - **Shape partitioning** ([`ShapePartition`]): batch / sparse / dense axis split
//! - **nse resolution** ([`Nse`]): counts and fractions of the sparse capacity
//! - **Index helpers** ([`unravel_index`], [`ravel_index`]): row-major conversions
//!
//! ## Quick Start
//!
//! ```
//! use spfix_core::{Nse, PrngKey, ShapePartition};
//!
//! let part = ShapePartition::new(&[4, 8, 8], 1, 0)?;
//! let nse = part.resolve_nse(Nse::Fraction(0.25))?;
//! assert_eq!(nse, 16);
//!
//! // One key per batch element plus one for the values
//! let keys = PrngKey::new(0).split(part.batch_size() + 1);
//! assert_eq!(keys.len(), 5);
//! # Ok::<(), spfix_core::ShapeError>(())
//! ```
//!
//! ## SciRS2 Integration
//!
//! Random number generation goes through `scirs2_core::random`; `rand` is
//! never used directly.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for keys, partitions and [`Nse`]

#![deny(warnings)]

pub mod error;
pub mod key;
pub mod shape;


pub use error::{ShapeError, ShapeResult};
pub use key::PrngKey;
pub use shape::{checked_size, ravel_index, unravel_index, Nse, Shape, ShapePartition};
