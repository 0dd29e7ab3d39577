//! Core trait definitions for the forest predictor.
//!
//! These are the seams between the forest engine and its collaborators:
//! the feature accessor that supplies example values, the split rules and
//! edge predictors stored in the node arena, and persistence.

use crate::core::error::{ForestError, Result};
use crate::core::types::*;
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use std::fmt::Debug;
use std::io::Write;

/// Indexed read access to the features of one example.
///
/// Indices the example does not store read as `0.0`. An accessor may reject
/// a read with [`ForestError::FeatureValueInvalid`]; the forest hands such
/// errors back to its caller unchanged.
pub trait FeatureAccessor {
    /// Returns the value of feature `index`.
    fn value(&self, index: FeatureIndex) -> Result<f64>;
}

impl<T: AsPrimitive<f64>> FeatureAccessor for [T] {
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        Ok(self.get(index).map_or(0.0, |v| v.as_()))
    }
}

impl<T: AsPrimitive<f64>, const N: usize> FeatureAccessor for [T; N] {
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        self.as_slice().value(index)
    }
}

impl<T: AsPrimitive<f64>> FeatureAccessor for Vec<T> {
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        self.as_slice().value(index)
    }
}

impl<S, T> FeatureAccessor for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
    T: AsPrimitive<f64>,
{
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        Ok(self.get(index).map_or(0.0, |v| v.as_()))
    }
}

impl<A: FeatureAccessor + ?Sized> FeatureAccessor for &A {
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        (**self).value(index)
    }
}

/// A rule that routes an example down one of the two edges of a node.
pub trait SplitRule: Clone + Debug + Send + Sync {
    /// Evaluates the rule on an example and returns the chosen branch.
    fn evaluate<A: FeatureAccessor + ?Sized>(&self, input: &A) -> Result<Branch>;

    /// Index of the feature the rule reads.
    fn feature_index(&self) -> FeatureIndex;

    /// Returns false if a parameter of the rule is NaN or infinite.
    /// Such rules cannot be written as JSON.
    fn is_finite(&self) -> bool {
        true
    }
}

/// The scalar contribution attached to one edge.
pub trait EdgePredictor: Clone + Debug + Send + Sync {
    /// Value added to the prediction sum whenever the edge is taken.
    fn value(&self) -> Score;

    /// Returns false if the contribution is NaN or infinite.
    fn is_finite(&self) -> bool {
        self.value().is_finite()
    }
}

/// Trait for serializable components.
pub trait Persistable: Serialize + for<'de> Deserialize<'de> {
    /// Save component to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        bincode::serialize_into(&mut writer, self).map_err(|e| ForestError::Serialization {
            message: format!("Failed to serialize: {}", e),
        })?;
        writer.flush()?;
        Ok(())
    }

    /// Load component from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::io::BufReader::new(std::fs::File::open(path)?);
        bincode::deserialize_from(file).map_err(|e| ForestError::Serialization {
            message: format!("Failed to deserialize: {}", e),
        })
    }
}
