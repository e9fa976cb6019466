//! Pluggable value generation
//!
//! A [`ValueGenerator`] fills the data tensor of a generated array. It gets
//! its own key, the exact target shape `batch_shape + (nse,) + dense_shape`,
//! and a bag of caller-supplied [`GeneratorOptions`]. The generated array's
//! shape is checked at assembly time; the distribution is up to the
//! generator.
//!
//! Provided generators:
//!
//! | Generator   | Options (default)              | Distribution            |
//! |-------------|--------------------------------|-------------------------|
//! | [`Uniform`] | `minval` (0.0), `maxval` (1.0) | U\[minval, maxval)      |
//! | [`Normal`]  | `mean` (0.0), `std` (1.0)      | N(mean, std²)           |
//!
//! Any closure `Fn(PrngKey, &[usize], &GeneratorOptions) -> anyhow::Result<Array<T, IxDyn>>`
//! is a generator too.
//!
//! # Examples
//!
//! ```
//! use spfix_core::{checked_size, PrngKey};
//! use spfix_sparse::generator::{GeneratorOptions, Uniform, ValueGenerator};
//!
//! let options = GeneratorOptions::new().with("minval", -1.0).with("maxval", 1.0);
//! let values = ValueGenerator::<f64>::generate(&Uniform, PrngKey::new(0), &[4, 3], &options).unwrap();
//! assert_eq!(values.shape(), &[4, 3]);
//! assert!(values.iter().all(|&v| (-1.0..1.0).contains(&v)));
//! ```

use anyhow::{anyhow, bail, Result};
use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::numeric::{Float, NumCast};
use scirs2_core::random::Rng;
use scirs2_core::StandardNormal;
use spfix_core::{checked_size, PrngKey};
use std::collections::BTreeMap;
use std::fmt;

/// A single generator option value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(x) => Some(*x),
            OptionValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Float(x) => write!(f, "{}", x),
            OptionValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(x: f64) -> Self {
        OptionValue::Float(x)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

/// Open set of named options forwarded verbatim to a generator
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GeneratorOptions {
    values: BTreeMap<String, OptionValue>,
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Numeric option with a default
    ///
    /// # Errors
    ///
    /// Fails if the option is present but not numeric.
    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64> {
        match self.values.get(name) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| anyhow!("option '{}' must be numeric, got {}", name, value)),
        }
    }

    /// Reject option names outside `known`
    pub fn ensure_known(&self, generator: &str, known: &[&str]) -> Result<()> {
        if let Some(name) = self.values.keys().find(|k| !known.contains(&k.as_str())) {
            bail!(
                "{} got an unexpected option '{}' (accepted: {:?})",
                generator,
                name,
                known
            );
        }
        Ok(())
    }
}

/// Strategy that fills the data tensor of a generated sparse array
///
/// Implementations must return an array of exactly `shape`; the assembler
/// rejects anything else.
pub trait ValueGenerator<T> {
    fn generate(
        &self,
        key: PrngKey,
        shape: &[usize],
        options: &GeneratorOptions,
    ) -> Result<Array<T, IxDyn>>;
}

impl<T, F> ValueGenerator<T> for F
where
    F: Fn(PrngKey, &[usize], &GeneratorOptions) -> Result<Array<T, IxDyn>>,
{
    fn generate(
        &self,
        key: PrngKey,
        shape: &[usize],
        options: &GeneratorOptions,
    ) -> Result<Array<T, IxDyn>> {
        self(key, shape, options)
    }
}

fn cast<T: NumCast>(value: f64) -> Result<T> {
    <T as NumCast>::from(value)
        .ok_or_else(|| anyhow!("value {} is not representable in the target dtype", value))
}

/// Uniform values in `[minval, maxval)`; the default generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uniform;

impl Uniform {
    pub const OPTIONS: [&'static str; 2] = ["minval", "maxval"];
}

impl<T: Float> ValueGenerator<T> for Uniform {
    fn generate(
        &self,
        key: PrngKey,
        shape: &[usize],
        options: &GeneratorOptions,
    ) -> Result<Array<T, IxDyn>> {
        options.ensure_known("uniform", &Self::OPTIONS)?;
        let minval = options.f64_or("minval", 0.0)?;
        let maxval = options.f64_or("maxval", 1.0)?;
        if minval.is_nan() || maxval.is_nan() || minval >= maxval {
            bail!("uniform requires minval < maxval, got [{}, {})", minval, maxval);
        }

        let low: T = cast(minval)?;
        let high: T = cast(maxval)?;
        let range = high - low;

        let mut rng = key.into_rng();
        let total = checked_size(shape)?;
        let data = (0..total)
            .map(|_| {
                let u: T = cast(rng.random::<f64>())?;
                // Rounding in narrow dtypes can land exactly on the upper bound
                let v = low + u * range;
                Ok(if v < high { v } else { low })
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(Array::from_shape_vec(IxDyn(shape), data)?)
    }
}

/// Normally distributed values with options `mean` and `std`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normal;

impl Normal {
    pub const OPTIONS: [&'static str; 2] = ["mean", "std"];
}

impl<T: Float> ValueGenerator<T> for Normal {
    fn generate(
        &self,
        key: PrngKey,
        shape: &[usize],
        options: &GeneratorOptions,
    ) -> Result<Array<T, IxDyn>> {
        options.ensure_known("normal", &Self::OPTIONS)?;
        let mean = options.f64_or("mean", 0.0)?;
        let std = options.f64_or("std", 1.0)?;
        if std.is_nan() || std < 0.0 {
            bail!("normal requires std >= 0, got {}", std);
        }

        let mut rng = key.into_rng();
        let total = checked_size(shape)?;
        let data = (0..total)
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                cast(mean + std * z)
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(Array::from_shape_vec(IxDyn(shape), data)?)
    }
}
