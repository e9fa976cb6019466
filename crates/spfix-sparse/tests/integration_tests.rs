//! End-to-end tests for random BCOO generation

use scirs2_core::ndarray_ext::{Array, IxDyn};
use scirs2_core::random::Rng;
use spfix_core::{PrngKey, ShapeError};
use spfix_sparse::{
    random_bcoo, random_bcoo_with, GeneratorOptions, Normal, RandomBcooConfig, RandomSparseError,
};

#[test]
fn test_matrix_two_unique_rows() {
    let config = RandomBcooConfig::new().with_nse(2usize);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[2, 5], &config).unwrap();

    assert_eq!(bcoo.indices().shape(), &[2, 2]);
    assert_eq!(bcoo.data().shape(), &[2]);

    let rows = bcoo.batch_rows(0).unwrap();
    for row in &rows {
        assert!(row[0] < 2 && row[1] < 5, "row {:?}", row);
    }
    assert_ne!(rows[0], rows[1]);
}

#[test]
fn test_batched_vector_unravels_against_sparse_axis() {
    // shape (2 | 5): two batch elements, each with 2 distinct positions in 0..5
    let config = RandomBcooConfig::new().with_nse(2usize).with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[2, 5], &config).unwrap();

    assert_eq!(bcoo.indices().shape(), &[2, 2, 1]);
    assert_eq!(bcoo.sparse_shape(), &[5]);
    for b in 0..2 {
        let rows = bcoo.batch_rows(b).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 1 && r[0] < 5));
        assert_ne!(rows[0], rows[1]);
    }
}

#[test]
fn test_fractional_nse_resolution() {
    let half = RandomBcooConfig::new().with_nse(0.5).with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(1), &[3, 10], &half).unwrap();
    assert_eq!(bcoo.nse(), 5);

    let odd = RandomBcooConfig::new().with_nse(0.21);
    let bcoo = random_bcoo::<f64>(PrngKey::new(1), &[10], &odd).unwrap();
    assert_eq!(bcoo.nse(), 3);
}

#[test]
fn test_full_sparse_fill_is_rejected() {
    // nse == sparse_size stays an error even though the fill is well defined
    let config = RandomBcooConfig::new().with_nse(16usize);
    let err = random_bcoo::<f64>(PrngKey::new(0), &[4, 4], &config).unwrap_err();
    assert!(matches!(
        err,
        RandomSparseError::Shape(ShapeError::InvalidNse { sparse_size: 16, .. })
    ));

    let config = RandomBcooConfig::new().with_nse(15usize);
    assert!(random_bcoo::<f64>(PrngKey::new(0), &[4, 4], &config).is_ok());
}

#[test]
fn test_oversized_shapes_fail_without_panicking() {
    let config = RandomBcooConfig::new().with_nse(10usize);
    let result = std::panic::catch_unwind(|| {
        random_bcoo::<f64>(PrngKey::new(0), &[1 << 33, 1 << 33], &config)
    });
    let err = result.expect("generation must not panic").unwrap_err();
    assert!(matches!(
        err,
        RandomSparseError::Shape(ShapeError::SizeOverflow { .. })
    ));

    // Overflowing batch axes are rejected the same way
    let config = RandomBcooConfig::new().with_nse(1usize).with_n_batch(2);
    let err = random_bcoo::<f64>(PrngKey::new(0), &[1 << 33, 1 << 33, 4], &config).unwrap_err();
    assert!(matches!(
        err,
        RandomSparseError::Shape(ShapeError::SizeOverflow { .. })
    ));
}

#[test]
fn test_partition_rejection() {
    let config = RandomBcooConfig::new().with_n_batch(2).with_n_dense(1);
    let err = random_bcoo::<f64>(PrngKey::new(0), &[3, 4], &config).unwrap_err();
    assert!(matches!(
        err,
        RandomSparseError::Shape(ShapeError::InvalidPartition {
            n_batch: 2,
            n_dense: 1,
            ..
        })
    ));
}

#[test]
fn test_no_sparse_axes() {
    let config = RandomBcooConfig::new()
        .with_nse(0usize)
        .with_n_batch(1)
        .with_n_dense(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[3, 4], &config).unwrap();

    assert_eq!(bcoo.indices().shape(), &[3, 0, 0]);
    assert_eq!(bcoo.data().shape(), &[3, 0, 4]);
    assert_eq!(bcoo.n_sparse(), 0);

    // Batch axes only
    let config = RandomBcooConfig::new().with_nse(0usize).with_n_batch(2);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[3, 4], &config).unwrap();
    assert_eq!(bcoo.indices().shape(), &[3, 4, 0, 0]);
}

#[test]
fn test_zero_nse() {
    let config = RandomBcooConfig::new().with_nse(0usize).with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[2, 6, 6], &config).unwrap();
    assert_eq!(bcoo.indices().shape(), &[2, 0, 2]);
    assert_eq!(bcoo.data().shape(), &[2, 0]);
}

#[test]
fn test_zero_length_batch_axis() {
    let config = RandomBcooConfig::new().with_nse(2usize).with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(0), &[0, 5], &config).unwrap();
    assert_eq!(bcoo.indices().shape(), &[0, 2, 1]);
    assert_eq!(bcoo.data().shape(), &[0, 2]);
}

#[test]
fn test_determinism() {
    let config = RandomBcooConfig::new()
        .with_nse(0.3)
        .with_n_batch(2)
        .with_n_dense(1);
    let shape = [2, 3, 7, 5, 2];
    let a = random_bcoo::<f64>(PrngKey::new(1234), &shape, &config).unwrap();
    let b = random_bcoo::<f64>(PrngKey::new(1234), &shape, &config).unwrap();
    assert_eq!(a.indices(), b.indices());
    assert_eq!(a.data(), b.data());

    let c = random_bcoo::<f64>(PrngKey::new(1235), &shape, &config).unwrap();
    assert_ne!(a.indices(), c.indices());
}

#[test]
fn test_batches_are_independent() {
    let config = RandomBcooConfig::new().with_nse(10usize).with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(5), &[4, 20, 20], &config).unwrap();
    let first = bcoo.batch_rows(0).unwrap();
    assert!((1..4).any(|b| bcoo.batch_rows(b).unwrap() != first));
}

#[test]
fn test_with_replacement() {
    // 50 draws from 10 positions must repeat; uniqueness is not required
    let config = RandomBcooConfig::new()
        .with_nse(9usize)
        .with_unique_indices(false)
        .with_n_batch(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(2), &[50, 10], &config).unwrap();
    assert_eq!(bcoo.indices().shape(), &[50, 9, 1]);
    assert!(bcoo.indices().iter().all(|&i| i < 10));
    assert!(!bcoo.has_unique_indices());
}

#[test]
fn test_value_range_options() {
    let config = RandomBcooConfig::new()
        .with_nse(30usize)
        .with_option("minval", -2.0)
        .with_option("maxval", -1.0);
    let bcoo = random_bcoo::<f32>(PrngKey::new(3), &[10, 10], &config).unwrap();
    assert!(bcoo.data().iter().all(|&v| (-2.0..-1.0).contains(&v)));
}

#[test]
fn test_normal_generator() {
    let config = RandomBcooConfig::new()
        .with_nse(50usize)
        .with_n_dense(1)
        .with_option("mean", 10.0)
        .with_option("std", 0.0);
    let bcoo = random_bcoo_with::<f64, _>(PrngKey::new(3), &[100, 4], &config, &Normal).unwrap();
    assert_eq!(bcoo.data().shape(), &[50, 4]);
    assert!(bcoo.data().iter().all(|&v| v == 10.0));
}

#[test]
fn test_generator_receives_options() {
    let scaled = |key: PrngKey, shape: &[usize], opts: &GeneratorOptions| {
        let scale = opts.f64_or("scale", 1.0)?;
        let mut rng = key.into_rng();
        let total: usize = shape.iter().product();
        let values: Vec<f64> = (0..total).map(|_| scale * rng.random::<f64>()).collect();
        Ok::<_, anyhow::Error>(Array::from_shape_vec(IxDyn(shape), values)?)
    };
    let config = RandomBcooConfig::new()
        .with_nse(5usize)
        .with_option("scale", 100.0);
    let bcoo = random_bcoo_with(PrngKey::new(0), &[8, 8], &config, &scaled).unwrap();
    assert!(bcoo.data().iter().all(|&v| (0.0..100.0).contains(&v)));
}

#[test]
fn test_invalid_generator_option_surfaces() {
    let config = RandomBcooConfig::new().with_option("loc", 0.0);
    let err = random_bcoo::<f64>(PrngKey::new(0), &[10, 10], &config).unwrap_err();
    assert!(matches!(err, RandomSparseError::Generator(_)));
}

#[test]
fn test_into_parts() {
    let config = RandomBcooConfig::new().with_nse(4usize).with_n_dense(1);
    let bcoo = random_bcoo::<f64>(PrngKey::new(6), &[6, 6, 3], &config).unwrap();
    let (data, indices, shape) = bcoo.into_parts();
    assert_eq!(data.shape(), &[4, 3]);
    assert_eq!(indices.shape(), &[4, 2]);
    assert_eq!(shape, vec![6, 6, 3]);
}
