//! # Forest Predictor
//!
//! An incremental, additive binary decision forest: a growable ensemble of
//! binary decision trees whose edges carry scalar contributions. The
//! prediction for an example is the sum of the contributions of every edge
//! it takes, over all trees, which is the classic gradient-boosted-tree
//! representation.
//!
//! ## Features
//!
//! - **Incremental growth**: a trainer grows the forest one interior node at
//!   a time by splitting growth points (a new root, or a terminal edge).
//! - **Stable addressing**: nodes live in an append-only arena and are
//!   addressed by their creation index for the lifetime of the forest.
//! - **Path indicators**: every prediction can be turned into a fixed-length
//!   edge indicator vector, ready to feed a downstream linear model.
//! - **Parallel batch prediction**: a grown forest is read-only and can be
//!   evaluated from many threads with Rayon.
//!
//! ## Quick Start
//!
//! ```rust
//! use forest_predictor::{ConstantPredictor, SimpleForestPredictor, SplitAction, ThresholdRule};
//!
//! # fn main() -> forest_predictor::Result<()> {
//! let mut forest = SimpleForestPredictor::new();
//!
//! // First tree: a root with one refined edge
//! let tree = forest.split(SplitAction::new(
//!     forest.new_root_id(),
//!     ThresholdRule::new(0, 0.3),
//!     [ConstantPredictor::new(-1.0), ConstantPredictor::new(1.0)],
//! ))?;
//! forest.split(SplitAction::new(
//!     forest.child_id(tree, 0)?,
//!     ThresholdRule::new(1, 0.6),
//!     [ConstantPredictor::new(-2.0), ConstantPredictor::new(2.0)],
//! ))?;
//!
//! // Second tree: a single stump
//! forest.split(SplitAction::new(
//!     forest.new_root_id(),
//!     ThresholdRule::new(0, 0.2),
//!     [ConstantPredictor::new(-3.0), ConstantPredictor::new(3.0)],
//! ))?;
//!
//! let example = [0.25, 0.7];
//! assert_eq!(forest.predict_tree(&example, tree)?, 1.0);
//! assert_eq!(forest.predict(&example)?, 4.0);
//! assert_eq!(
//!     forest.edge_indicator_vector(&example)?,
//!     vec![true, false, false, true, false, true]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Handle types, constants, error handling and trait abstractions
//! - [`config`]: Configuration loading and validation
//! - [`forest`]: The node arena, growth points and traversal engine
//! - [`features`]: Sparse binary feature vectors
//! - [`prediction`]: Batch and parallel prediction
//! - [`io`]: Forest snapshots and persistence
//! - [`utils`]: Summary statistics

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

pub mod core;

pub mod config;

pub mod features;

pub mod forest;

pub mod io;

pub mod prediction;

pub mod utils;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{ForestError, Result},
    traits::*,
    types::*,
};

pub use config::{Config, ConfigBuilder};

pub use features::SparseBinaryVector;

pub use forest::{
    ConstantPredictor, Edge, ForestPredictor, GrowthPointId, InteriorNode, SimpleForestPredictor,
    SimpleSplitAction, SplitAction, ThresholdRule,
};

pub use io::{ForestSnapshot, SerializationFormat};

pub use prediction::{BatchPredictor, PredictionConfig};

pub use utils::VectorStatistics;

pub use crate::core::constants::FOREST_PREDICTOR_VERSION as VERSION;

/// Initialize the library with default settings.
///
/// Installs an `env_logger` logger at the default verbosity unless the host
/// application already installed one. Calling it more than once is harmless.
pub fn init() -> Result<()> {
    init_with_config(&Config::default())
}

/// Initialize the library using the verbosity of `config`.
pub fn init_with_config(config: &Config) -> Result<()> {
    config.validate()?;
    crate::core::initialize_logging(config.verbosity);
    log::info!("forest-predictor {} initialized", VERSION);
    Ok(())
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    crate::core::is_logging_initialized()
}
