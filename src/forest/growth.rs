//! Growth-point addressing and split actions.

use crate::core::types::{Branch, NodeIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the forest that can be split into a new interior node.
///
/// Obtain one from [`ForestPredictor::new_root_id`] or
/// [`ForestPredictor::child_id`]. A `ChildOf` id is consumed by the split
/// that uses it.
///
/// [`ForestPredictor::new_root_id`]: crate::forest::ForestPredictor::new_root_id
/// [`ForestPredictor::child_id`]: crate::forest::ForestPredictor::child_id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthPointId {
    /// Start a new tree
    NewRoot,
    /// The terminal edge `branch` of interior node `node`
    ChildOf {
        /// Parent node
        node: NodeIndex,
        /// Edge of the parent to split
        branch: Branch,
    },
}

impl fmt::Display for GrowthPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthPointId::NewRoot => write!(f, "new root"),
            GrowthPointId::ChildOf { node, branch } => write!(f, "node {} edge {}", node, branch),
        }
    }
}

/// Everything needed to grow the forest by one interior node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitAction<R, P> {
    /// Where the new node goes
    pub growth_point: GrowthPointId,
    /// Rule of the new node
    pub split_rule: R,
    /// Contributions of the new node's two edges, in branch order
    pub edge_predictors: [P; 2],
}

impl<R, P> SplitAction<R, P> {
    /// Creates a split action.
    pub fn new(growth_point: GrowthPointId, split_rule: R, edge_predictors: [P; 2]) -> Self {
        Self {
            growth_point,
            split_rule,
            edge_predictors,
        }
    }
}
