//! Batch prediction over matrices of examples.
//!
//! A [`BatchPredictor`] borrows a grown forest read-only and evaluates it on
//! every row of a matrix. Large batches are spread over a rayon pool; the
//! forest needs no synchronization because nothing is mutated.

use crate::core::constants::{DEFAULT_NUM_THREADS, DEFAULT_PARALLEL_MIN_ROWS};
use crate::core::error::{ForestError, Result};
use crate::core::traits::{EdgePredictor, SplitRule};
use crate::core::types::{NodeIndex, Score};
use crate::ensure;
use crate::forest::ForestPredictor;
use crate::utils::VectorStatistics;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for batch prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Number of worker threads (0 = rayon's global pool)
    pub num_threads: usize,
    /// Batches with fewer rows are evaluated on the calling thread
    pub parallel_min_rows: usize,
}

impl PredictionConfig {
    /// Create a new prediction configuration with defaults
    pub fn new() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            parallel_min_rows: DEFAULT_PARALLEL_MIN_ROWS,
        }
    }

    /// Set the number of worker threads
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set the minimum batch size for parallel evaluation
    pub fn with_parallel_min_rows(mut self, parallel_min_rows: usize) -> Self {
        self.parallel_min_rows = parallel_min_rows;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.parallel_min_rows > 0,
            ForestError::invalid_parameter("parallel_min_rows", "0", "must be at least 1")
        );
        Ok(())
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates a forest on batches of examples.
#[derive(Debug)]
pub struct BatchPredictor<'a, R, P> {
    forest: &'a ForestPredictor<R, P>,
    config: PredictionConfig,
    pool: Option<rayon::ThreadPool>,
}

impl<'a, R: SplitRule, P: EdgePredictor> BatchPredictor<'a, R, P> {
    /// Create a batch predictor over `forest`
    pub fn new(forest: &'a ForestPredictor<R, P>, config: PredictionConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .build()
                .map_err(|e| ForestError::threading(format!("Failed to create thread pool: {}", e)))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { forest, config, pool })
    }

    /// Get prediction configuration
    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// The forest being evaluated
    pub fn forest(&self) -> &'a ForestPredictor<R, P> {
        self.forest
    }

    /// Whole-forest prediction for every row
    pub fn predict(&self, features: &ArrayView2<'_, f64>) -> Result<Array1<Score>> {
        let forest = self.forest;
        let scores = self.map_rows(features, |row| forest.predict(&row))?;
        Ok(Array1::from_vec(scores))
    }

    /// Prediction of the tree rooted at `root` for every row
    pub fn predict_tree(&self, features: &ArrayView2<'_, f64>, root: NodeIndex) -> Result<Array1<Score>> {
        if !self.forest.is_root(root) {
            return Err(ForestError::unknown_tree(root));
        }
        let forest = self.forest;
        let scores = self.map_rows(features, |row| forest.predict_tree(&row, root))?;
        Ok(Array1::from_vec(scores))
    }

    /// Edge indicator vectors, one row per example and two columns per
    /// interior node
    pub fn edge_indicators(&self, features: &ArrayView2<'_, f64>) -> Result<Array2<bool>> {
        let forest = self.forest;
        let rows = self.map_rows(features, |row| forest.edge_indicator_vector(&row))?;

        let width = forest.num_edges();
        let flat: Vec<bool> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((features.nrows(), width), flat)
            .map_err(|e| ForestError::dimension_mismatch(format!("({}, {})", features.nrows(), width), e.to_string()))
    }

    /// Statistics of the whole-forest predictions over the batch
    pub fn summarize(&self, features: &ArrayView2<'_, f64>) -> Result<VectorStatistics> {
        let scores = self.predict(features)?.to_vec();
        Ok(VectorStatistics::from_slice(&scores))
    }

    fn map_rows<T, F>(&self, features: &ArrayView2<'_, f64>, op: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(ArrayView1<'_, f64>) -> Result<T> + Send + Sync,
    {
        let num_rows = features.nrows();
        if num_rows < self.config.parallel_min_rows {
            log::trace!("Evaluating {} rows sequentially", num_rows);
            return features.axis_iter(Axis(0)).map(&op).collect();
        }

        log::debug!("Evaluating {} rows in parallel", num_rows);
        let run = || {
            features
                .axis_iter(Axis(0))
                .into_par_iter()
                .map(&op)
                .collect::<Result<Vec<T>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}
