//! Interior nodes and their edges.
//!
//! Nodes live in the forest's arena and refer to their children by index.
//! An edge without a target is terminal; once an edge is split its target is
//! set for good.

use crate::core::traits::EdgePredictor;
use crate::core::types::{Branch, NodeIndex, Score};
use serde::{Deserialize, Serialize};

/// One outcome of a node's split rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<P> {
    predictor: P,
    target: Option<NodeIndex>,
}

impl<P> Edge<P> {
    /// Creates a terminal edge.
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            target: None,
        }
    }

    /// Creates an edge pointing at `target`.
    pub fn with_target(predictor: P, target: Option<NodeIndex>) -> Self {
        Self { predictor, target }
    }

    /// The edge's predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Child node, if the edge has been split.
    pub fn target(&self) -> Option<NodeIndex> {
        self.target
    }

    /// Returns true if the edge has not been split.
    pub fn is_terminal(&self) -> bool {
        self.target.is_none()
    }

    pub(crate) fn set_target(&mut self, target: NodeIndex) {
        debug_assert!(self.target.is_none(), "edge already has a target");
        self.target = Some(target);
    }
}

impl<P: EdgePredictor> Edge<P> {
    /// Contribution added to the sum when the edge is taken.
    pub fn value(&self) -> Score {
        self.predictor.value()
    }
}

/// Interior node: a split rule and exactly two edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteriorNode<R, P> {
    split_rule: R,
    edges: [Edge<P>; 2],
}

impl<R, P> InteriorNode<R, P> {
    /// Creates a node whose edges are both terminal.
    pub fn new(split_rule: R, edge_predictors: [P; 2]) -> Self {
        let [left, right] = edge_predictors;
        Self {
            split_rule,
            edges: [Edge::new(left), Edge::new(right)],
        }
    }

    /// Creates a node from fully specified edges.
    pub fn from_edges(split_rule: R, edges: [Edge<P>; 2]) -> Self {
        Self { split_rule, edges }
    }

    /// The node's split rule.
    pub fn split_rule(&self) -> &R {
        &self.split_rule
    }

    /// Both edges in branch order.
    pub fn edges(&self) -> &[Edge<P>; 2] {
        &self.edges
    }

    /// The edge for `branch`.
    pub fn edge(&self, branch: Branch) -> &Edge<P> {
        &self.edges[branch.index()]
    }

    pub(crate) fn edge_mut(&mut self, branch: Branch) -> &mut Edge<P> {
        &mut self.edges[branch.index()]
    }

    /// Child indices of split edges, in branch order.
    pub fn children(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.edges.iter().filter_map(Edge::target)
    }
}
