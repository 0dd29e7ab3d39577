//! Prediction pipeline module.
//!
//! Single examples are evaluated directly on the forest
//! ([`ForestPredictor::predict`](crate::forest::ForestPredictor::predict));
//! this module evaluates whole matrices of examples, optionally in parallel.

pub mod predictor;

pub use predictor::{BatchPredictor, PredictionConfig};
