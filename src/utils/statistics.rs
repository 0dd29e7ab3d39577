//! Summary statistics over vectors of scores.

use serde::{Deserialize, Serialize};

/// Basic statistics of a vector of values.
///
/// An empty input produces an invalid summary with every statistic at 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorStatistics {
    valid: bool,
    size: usize,
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
    std_dev: f64,
}

impl VectorStatistics {
    /// Computes statistics over `values`.
    pub fn from_slice(values: &[f64]) -> Self {
        let Some(&first) = values.first() else {
            return Self::default();
        };

        let (min, max, sum) = values
            .iter()
            .fold((first, first, 0.0), |(min, max, sum), &x| (min.min(x), max.max(x), sum + x));
        let mean = sum / values.len() as f64;
        let variance = values.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / values.len() as f64;

        VectorStatistics {
            valid: true,
            size: values.len(),
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        }
    }

    /// Number of values summarized.
    pub fn num_elements(&self) -> usize {
        self.size
    }

    /// Smallest value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Returns true if the summary covers at least one value.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Sum of absolute element-wise differences. When lengths differ, the
    /// longer vector's tail is compared against 0.
    pub fn diff(a: &[f64], b: &[f64]) -> f64 {
        let len = a.len().max(b.len());
        (0..len)
            .map(|i| {
                let x = a.get(i).copied().unwrap_or(0.0);
                let y = b.get(i).copied().unwrap_or(0.0);
                (x - y).abs()
            })
            .sum()
    }
}

impl From<&[f64]> for VectorStatistics {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}
