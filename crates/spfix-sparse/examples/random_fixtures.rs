//! Random Fixture Generation Example
//!
//! This example walks through the common ways of building random BCOO
//! fixtures:
//! - Plain sparse matrices with a fractional nse
//! - Batched arrays with dense trailing axes
//! - Sampling with replacement
//! - Custom value generators driven by generator options
//!
//! Run with: cargo run --example random_fixtures --features tracing

use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::random::Rng;
use spfix_core::PrngKey;
use spfix_sparse::tracing_support::{init_tracing, TracingConfig};
use spfix_sparse::{random_bcoo, random_bcoo_with, GeneratorOptions, Normal, RandomBcooConfig};

fn main() -> anyhow::Result<()> {
    init_tracing(TracingConfig::default())?;

    println!("=== spfix: Random BCOO Fixtures ===\n");

    let root = PrngKey::new(42);
    let mut keys = root.split(4).into_iter();
    let mut next_key = || keys.next().ok_or_else(|| anyhow::anyhow!("out of keys"));

    // 1. A 6x8 matrix with the default 20% density
    println!("1. Sparse 6x8 matrix, default density...");
    let matrix = random_bcoo::<f64>(next_key()?, &[6, 8], &RandomBcooConfig::new())?;
    println!(
        "   nse = {}, density = {:.1}%",
        matrix.nse(),
        matrix.density() * 100.0
    );
    for (row, value) in matrix.batch_rows(0).unwrap_or_default().iter().zip(matrix.data()) {
        println!("   {:?} -> {:.4}", row, value);
    }
    println!();

    // 2. Three batches of 5x5 sparse matrices with 2 dense channels
    println!("2. Batched (3 | 5x5 | 2) array...");
    let config = RandomBcooConfig::new()
        .with_nse(4usize)
        .with_n_batch(1)
        .with_n_dense(1);
    let batched = random_bcoo_with::<f32, _>(next_key()?, &[3, 5, 5, 2], &config, &Normal)?;
    println!("   indices shape: {:?}", batched.indices().shape());
    println!("   data shape:    {:?}", batched.data().shape());
    println!("   unique:        {}\n", batched.has_unique_indices());

    // 3. Sampling with replacement
    println!("3. Sampling with replacement...");
    let config = RandomBcooConfig::new()
        .with_nse(0.9)
        .with_unique_indices(false);
    let replaced = random_bcoo::<f64>(next_key()?, &[4, 4], &config)?;
    println!(
        "   nse = {}, all coordinates distinct: {}\n",
        replaced.nse(),
        replaced.has_unique_indices()
    );

    // 4. Integer values from a custom generator
    println!("4. Custom integer generator...");
    let dice = |key: PrngKey, shape: &[usize], opts: &GeneratorOptions| {
        opts.ensure_known("dice", &["sides"])?;
        let sides = opts.f64_or("sides", 6.0)? as i64;
        let mut rng = key.into_rng();
        let total: usize = shape.iter().product();
        let rolls: Vec<i64> = (0..total).map(|_| rng.random_range(1..=sides)).collect();
        Ok::<_, anyhow::Error>(Array::from_shape_vec(IxDyn(shape), rolls)?)
    };
    let config = RandomBcooConfig::new()
        .with_nse(5usize)
        .with_option("sides", 20i64);
    let rolled = random_bcoo_with(next_key()?, &[10, 10], &config, &dice)?;
    println!("   rolls: {:?}", rolled.data().iter().collect::<Vec<_>>());

    println!("\n=== Done ===");
    Ok(())
}
