//! Sparse binary feature vector.
//!
//! Stores only the indices whose value is exactly `1.0`. Every other index
//! reads as `0.0`. This is the representation handed to downstream linear
//! models built on top of tree-path indicators.

use crate::core::error::{ForestError, Result};
use crate::core::traits::FeatureAccessor;
use crate::core::types::FeatureIndex;
use serde::{Deserialize, Serialize};

/// A vector whose entries are all 0 or 1, stored as ascending set indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseBinaryVector {
    indices: Vec<FeatureIndex>,
}

impl SparseBinaryVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty vector with room for `capacity` set entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
        }
    }

    /// Builds a vector from strictly ascending set indices.
    pub fn from_indices<I>(indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = FeatureIndex>,
    {
        let mut vector = Self::new();
        for index in indices {
            vector.push(index, 1.0)?;
        }
        Ok(vector)
    }

    /// Builds a vector from a dense indicator, one entry per bool.
    pub fn from_indicators(indicators: &[bool]) -> Self {
        Self {
            indices: indicators
                .iter()
                .enumerate()
                .filter_map(|(i, &set)| set.then_some(i))
                .collect(),
        }
    }

    /// Appends an entry.
    ///
    /// `value` must be `0.0` (nothing is stored) or `1.0`. Indices must be
    /// appended in strictly increasing order.
    pub fn push(&mut self, index: FeatureIndex, value: f64) -> Result<()> {
        if value == 0.0 {
            return Ok(());
        }
        if value != 1.0 {
            return Err(ForestError::feature_value_invalid(
                index,
                value,
                "sparse binary vectors hold only 0 or 1",
            ));
        }
        if let Some(&last) = self.indices.last() {
            if index <= last {
                return Err(ForestError::feature_value_invalid(
                    index,
                    value,
                    format!("indices must be strictly increasing, last index is {}", last),
                ));
            }
        }
        self.indices.push(index);
        Ok(())
    }

    /// Smallest dense length that holds every set entry: one past the
    /// largest set index, or 0 when nothing is set.
    ///
    /// This is not the number of set entries; see
    /// [`num_nonzeros`](Self::num_nonzeros).
    pub fn dimension(&self) -> usize {
        self.indices.last().map_or(0, |&last| last + 1)
    }

    /// Returns true if no entry is set.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of entries equal to 1.
    pub fn num_nonzeros(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if entry `index` is 1.
    pub fn contains(&self, index: FeatureIndex) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Ascending set indices.
    pub fn indices(&self) -> &[FeatureIndex] {
        &self.indices
    }

    /// Iterates over set indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureIndex> + '_ {
        self.indices.iter().copied()
    }

    /// Dot product with a dense vector. Indices past its end contribute 0.
    pub fn dot(&self, other: &[f64]) -> f64 {
        self.iter().filter_map(|i| other.get(i)).sum()
    }

    /// Adds `scale` to every entry of `target` whose index is set.
    pub fn add_to(&self, target: &mut [f64], scale: f64) {
        for i in self.iter() {
            if let Some(slot) = target.get_mut(i) {
                *slot += scale;
            }
        }
    }

    /// Expands into a dense vector of length `max(len, self.dimension())`.
    pub fn to_dense(&self, len: usize) -> Vec<f64> {
        let mut dense = vec![0.0; len.max(self.dimension())];
        self.add_to(&mut dense, 1.0);
        dense
    }
}

impl FeatureAccessor for SparseBinaryVector {
    fn value(&self, index: FeatureIndex) -> Result<f64> {
        Ok(if self.contains(index) { 1.0 } else { 0.0 })
    }
}
