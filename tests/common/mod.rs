//! Common test utilities for forest predictor integration tests.

#![allow(dead_code)]

use forest_predictor::*;
use ndarray::Array2;
use rand::prelude::*;

/// Grow `forest` at `growth_point` with a threshold rule and two constant edges
pub fn grow(
    forest: &mut SimpleForestPredictor,
    growth_point: GrowthPointId,
    feature: usize,
    threshold: f64,
    values: [f64; 2],
) -> Result<NodeIndex> {
    let action: SimpleSplitAction = SplitAction::new(
        growth_point,
        ThresholdRule::new(feature, threshold),
        values.map(ConstantPredictor::new),
    );
    forest.split(action)
}

/// Two-tree reference forest.
///
/// Tree A: root `x0 <= 0.3` with edges {-1, +1}, its left child `x1 <= 0.6`
/// with edges {-2, +2} and its right child `x2 <= 0.9` with edges {-4, +4}.
/// Tree B: a single stump `x0 <= 0.2` with edges {-3, +3}.
pub fn create_reference_forest() -> (SimpleForestPredictor, NodeIndex, NodeIndex) {
    let mut forest = SimpleForestPredictor::new();
    let tree_a = grow(&mut forest, GrowthPointId::NewRoot, 0, 0.3, [-1.0, 1.0]).unwrap();
    let left = forest.child_id(tree_a, 0).unwrap();
    grow(&mut forest, left, 1, 0.6, [-2.0, 2.0]).unwrap();
    let right = forest.child_id(tree_a, 1).unwrap();
    grow(&mut forest, right, 2, 0.9, [-4.0, 4.0]).unwrap();
    let tree_b = grow(&mut forest, GrowthPointId::NewRoot, 0, 0.2, [-3.0, 3.0]).unwrap();
    (forest, tree_a, tree_b)
}

/// Grow a random forest with `num_trees` trees and `num_splits` extra splits.
///
/// Splits are spread over all trees, so node indices of different trees
/// interleave in the arena.
pub fn create_random_forest(
    rng: &mut StdRng,
    num_trees: usize,
    num_splits: usize,
    num_features: usize,
) -> SimpleForestPredictor {
    let mut forest = SimpleForestPredictor::new();
    let mut open: Vec<GrowthPointId> = Vec::new();

    for _ in 0..num_trees {
        let node = grow_random(&mut forest, rng, GrowthPointId::NewRoot, num_features);
        open.extend([0, 1].map(|edge| forest.child_id(node, edge).unwrap()));
    }

    for _ in 0..num_splits {
        if open.is_empty() {
            break;
        }
        let growth_point = open.swap_remove(rng.gen_range(0..open.len()));
        let node = grow_random(&mut forest, rng, growth_point, num_features);
        open.extend([0, 1].map(|edge| forest.child_id(node, edge).unwrap()));
    }

    forest
}

fn grow_random(
    forest: &mut SimpleForestPredictor,
    rng: &mut StdRng,
    growth_point: GrowthPointId,
    num_features: usize,
) -> NodeIndex {
    let feature = rng.gen_range(0..num_features);
    let threshold = rng.gen_range(-1.0..1.0);
    let values = [rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)];
    grow(forest, growth_point, feature, threshold, values).unwrap()
}

/// Random feature matrix with values in [-1, 1)
pub fn create_random_features(rng: &mut StdRng, num_rows: usize, num_features: usize) -> Array2<f64> {
    Array2::from_shape_fn((num_rows, num_features), |_| rng.gen_range(-1.0..1.0))
}

/// Sum of the edge values selected by an indicator vector
pub fn indicator_sum(forest: &SimpleForestPredictor, indicators: &[bool]) -> f64 {
    forest
        .nodes()
        .iter()
        .enumerate()
        .flat_map(|(index, node)| {
            Branch::ALL
                .into_iter()
                .filter(move |branch| indicators[2 * index + branch.index()])
                .map(move |branch| node.edge(branch).value())
        })
        .sum()
}

/// Feature accessor that fails on one index
pub struct FailingAccessor {
    pub values: Vec<f64>,
    pub failing_index: usize,
}

impl FeatureAccessor for FailingAccessor {
    fn value(&self, index: usize) -> Result<f64> {
        if index == self.failing_index {
            Err(ForestError::feature_value_invalid(index, f64::NAN, "sensor offline"))
        } else {
            Ok(self.values.get(index).copied().unwrap_or(0.0))
        }
    }
}
