//! Incremental additive decision forest.
//!
//! The forest is grown one interior node at a time through [`ForestPredictor::split`]
//! and evaluated read-only afterwards. Every edge carries a constant
//! contribution; a prediction is the sum of the contributions of the edges
//! an example takes, over all trees.
//!
//! ```rust
//! use forest_predictor::forest::{ConstantPredictor, SimpleForestPredictor, SplitAction, ThresholdRule};
//!
//! let mut forest = SimpleForestPredictor::new();
//! let root = forest.split(SplitAction::new(
//!     forest.new_root_id(),
//!     ThresholdRule::new(0, 0.5),
//!     [ConstantPredictor::new(-1.0), ConstantPredictor::new(1.0)],
//! ))?;
//! forest.split(SplitAction::new(
//!     forest.child_id(root, 1)?,
//!     ThresholdRule::new(1, 0.0),
//!     [ConstantPredictor::new(0.25), ConstantPredictor::new(0.5)],
//! ))?;
//!
//! assert_eq!(forest.predict(&[0.9, 1.0])?, 1.5);
//! assert_eq!(forest.edge_indicator_vector(&[0.9, 1.0])?, vec![false, true, false, true]);
//! # Ok::<(), forest_predictor::ForestError>(())
//! ```

pub mod growth;
pub mod node;
pub mod predictor;
pub mod rules;

pub use growth::{GrowthPointId, SplitAction};
pub use node::{Edge, InteriorNode};
pub use predictor::ForestPredictor;
pub use rules::{ConstantPredictor, ThresholdRule};

use static_assertions::assert_impl_all;

/// Forest of single-feature threshold rules with constant edge values.
pub type SimpleForestPredictor = ForestPredictor<ThresholdRule, ConstantPredictor>;

/// Split action for a [`SimpleForestPredictor`].
pub type SimpleSplitAction = SplitAction<ThresholdRule, ConstantPredictor>;

// A grown forest is shared read-only across prediction threads.
assert_impl_all!(SimpleForestPredictor: Send, Sync, Clone);
