//! Integration tests for batch and parallel prediction.

use anyhow::Result;
use approx::assert_abs_diff_eq;
use forest_predictor::*;
use ndarray::{array, Axis};
use rand::prelude::*;

mod common;
use common::*;

#[test]
fn test_parallel_matches_sequential() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let forest = create_random_forest(&mut rng, 20, 200, 6);
    let features = create_random_features(&mut rng, 2_000, 6);

    let sequential = BatchPredictor::new(&forest, PredictionConfig::new().with_parallel_min_rows(usize::MAX))?;
    let parallel = BatchPredictor::new(
        &forest,
        PredictionConfig::new().with_num_threads(4).with_parallel_min_rows(1),
    )?;

    let a = sequential.predict(&features.view())?;
    let b = parallel.predict(&features.view())?;
    assert_eq!(a.len(), 2_000);
    assert_abs_diff_eq!(VectorStatistics::diff(a.as_slice().unwrap(), b.as_slice().unwrap()), 0.0);
    Ok(())
}

#[test]
fn test_batch_matches_single_example() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let forest = create_random_forest(&mut rng, 5, 40, 3);
    let features = create_random_features(&mut rng, 64, 3);
    let predictor = BatchPredictor::new(&forest, PredictionConfig::new().with_parallel_min_rows(16))?;

    let scores = predictor.predict(&features.view())?;
    let indicators = predictor.edge_indicators(&features.view())?;
    assert_eq!(indicators.dim(), (64, forest.num_edges()));

    for (i, row) in features.axis_iter(Axis(0)).enumerate() {
        assert_eq!(scores[i], forest.predict(&row)?);
        let expected = forest.edge_indicator_vector(&row)?;
        assert_eq!(indicators.row(i).to_vec(), expected);
    }
    Ok(())
}

#[test]
fn test_batch_tree_prediction() -> Result<()> {
    let (forest, tree_a, tree_b) = create_reference_forest();
    let features = array![[0.2, 0.5, 0.0], [0.2, 0.7, 0.0], [0.5, 0.7, 0.7], [0.5, 0.7, 1.0]];
    let predictor = BatchPredictor::new(&forest, PredictionConfig::new().with_parallel_min_rows(2))?;

    assert_eq!(predictor.predict_tree(&features.view(), tree_a)?, array![-3.0, 1.0, -3.0, 5.0]);
    assert_eq!(predictor.predict_tree(&features.view(), tree_b)?, array![-3.0, -3.0, 3.0, 3.0]);
    assert_eq!(predictor.predict(&features.view())?, array![-6.0, -2.0, 0.0, 8.0]);
    assert!(matches!(
        predictor.predict_tree(&features.view(), 2),
        Err(ForestError::UnknownTree { root: 2 })
    ));
    Ok(())
}

#[test]
fn test_batch_summary() -> Result<()> {
    let (forest, _, _) = create_reference_forest();
    let features = array![[0.2, 0.5, 0.0], [0.2, 0.7, 0.0], [0.5, 0.7, 0.7], [0.5, 0.7, 1.0]];
    let predictor = BatchPredictor::new(&forest, PredictionConfig::default())?;

    let stats = predictor.summarize(&features.view())?;
    assert!(stats.is_valid());
    assert_eq!(stats.num_elements(), 4);
    assert_abs_diff_eq!(stats.min(), -6.0);
    assert_abs_diff_eq!(stats.max(), 8.0);
    assert_abs_diff_eq!(stats.mean(), 0.0);
    assert_abs_diff_eq!(stats.variance(), 26.0);

    let empty = ndarray::Array2::<f64>::zeros((0, 3));
    assert!(!predictor.summarize(&empty.view())?.is_valid());
    Ok(())
}

#[test]
fn test_config_drives_batch_prediction() -> Result<()> {
    let (forest, _, _) = create_reference_forest();
    let config = ConfigBuilder::new().num_threads(2).parallel_min_rows(1).build()?;
    let predictor = BatchPredictor::new(&forest, config.prediction_config())?;

    assert_eq!(predictor.config().num_threads, 2);
    let features = array![[0.25, 0.7, 0.0]];
    assert_eq!(predictor.predict(&features.view())?, array![4.0]);
    Ok(())
}

#[test]
fn test_invalid_prediction_config_rejected() {
    let forest = SimpleForestPredictor::new();
    let result = BatchPredictor::new(&forest, PredictionConfig::new().with_parallel_min_rows(0));
    assert!(matches!(result, Err(ForestError::InvalidParameter { .. })));
}
