//! Split rules and edge predictors stored in the forest's node arena.

use crate::core::error::Result;
use crate::core::traits::{EdgePredictor, FeatureAccessor, SplitRule};
use crate::core::types::{Branch, FeatureIndex, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-feature threshold rule.
///
/// Routes an example to [`Branch::Left`] when the feature value is less than
/// or equal to the threshold and to [`Branch::Right`] otherwise. NaN compares
/// false and therefore goes right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Feature read by the rule
    pub feature_index: FeatureIndex,
    /// Inclusive upper bound of the left branch
    pub threshold: f64,
}

impl ThresholdRule {
    /// Creates a rule on `feature_index` with the given threshold.
    pub fn new(feature_index: FeatureIndex, threshold: f64) -> Self {
        Self {
            feature_index,
            threshold,
        }
    }
}

impl SplitRule for ThresholdRule {
    fn evaluate<A: FeatureAccessor + ?Sized>(&self, input: &A) -> Result<Branch> {
        let value = input.value(self.feature_index)?;
        Ok(Branch::from_threshold(value, self.threshold))
    }

    fn feature_index(&self) -> FeatureIndex {
        self.feature_index
    }

    fn is_finite(&self) -> bool {
        self.threshold.is_finite()
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x[{}] <= {}", self.feature_index, self.threshold)
    }
}

/// Constant edge contribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstantPredictor {
    /// Value added to the prediction sum
    pub value: Score,
}

impl ConstantPredictor {
    /// Creates a predictor returning `value`.
    pub fn new(value: Score) -> Self {
        Self { value }
    }
}

impl EdgePredictor for ConstantPredictor {
    fn value(&self) -> Score {
        self.value
    }
}

impl From<Score> for ConstantPredictor {
    fn from(value: Score) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ConstantPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value)
    }
}
