//! The forest engine: an append-only arena of interior nodes grouped into
//! trees whose edge contributions add up along the traversal path.
//!
//! Nodes are numbered in creation order. Trees are identified by the index of
//! their root node and kept in creation order; that order fixes both the
//! per-tree queries and the layout of the edge indicator vector.

use crate::config::Config;
use crate::core::constants::EDGES_PER_NODE;
use crate::core::error::{ForestError, Result};
use crate::core::traits::{EdgePredictor, FeatureAccessor, SplitRule};
use crate::core::types::{Branch, NodeIndex, Score};
use crate::features::SparseBinaryVector;
use crate::forest::growth::{GrowthPointId, SplitAction};
use crate::forest::node::InteriorNode;
use std::fmt;

/// Growable ensemble of binary decision trees with additive edge values.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestPredictor<R, P> {
    nodes: Vec<InteriorNode<R, P>>,
    roots: Vec<NodeIndex>,
}

impl<R: SplitRule, P: EdgePredictor> Default for ForestPredictor<R, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SplitRule, P: EdgePredictor> ForestPredictor<R, P> {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty forest with room for `capacity` interior nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            roots: Vec::new(),
        }
    }

    /// Creates an empty forest sized by the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.node_capacity)
    }

    /// Builds a forest from arena parts without checking them.
    /// Callers must have validated the structure.
    pub(crate) fn from_parts_unchecked(nodes: Vec<InteriorNode<R, P>>, roots: Vec<NodeIndex>) -> Self {
        Self { nodes, roots }
    }

    /// Growth point that starts a new tree. Always valid.
    pub fn new_root_id(&self) -> GrowthPointId {
        GrowthPointId::NewRoot
    }

    /// Growth point for edge `edge` of interior node `node`.
    ///
    /// Fails with [`ForestError::GrowthPointInvalid`] if the node does not
    /// exist, `edge` is not 0 or 1, or the edge has already been split.
    pub fn child_id(&self, node: NodeIndex, edge: usize) -> Result<GrowthPointId> {
        let branch = Branch::from_index(edge)
            .ok_or_else(|| ForestError::growth_point_invalid(node, edge, "edge index must be 0 or 1"))?;
        let growth_point = GrowthPointId::ChildOf { node, branch };
        self.check_growth_point(growth_point)?;
        Ok(growth_point)
    }

    /// Returns true if `growth_point` can currently be split.
    pub fn is_splittable(&self, growth_point: GrowthPointId) -> bool {
        self.check_growth_point(growth_point).is_ok()
    }

    fn check_growth_point(&self, growth_point: GrowthPointId) -> Result<()> {
        let (node, branch) = match growth_point {
            GrowthPointId::NewRoot => return Ok(()),
            GrowthPointId::ChildOf { node, branch } => (node, branch),
        };

        let parent = self.nodes.get(node).ok_or_else(|| {
            ForestError::growth_point_invalid(
                node,
                branch.index(),
                format!("node index out of range, forest has {} interior nodes", self.nodes.len()),
            )
        })?;

        match parent.edge(branch).target() {
            None => Ok(()),
            Some(target) => Err(ForestError::growth_point_invalid(
                node,
                branch.index(),
                format!("edge already split into node {}", target),
            )),
        }
    }

    /// Grows the forest by one interior node and returns its index.
    ///
    /// A `NewRoot` growth point starts a new tree; a `ChildOf` growth point
    /// attaches the node to that edge, which can then not be split again.
    /// On failure the forest is unchanged.
    pub fn split(&mut self, action: SplitAction<R, P>) -> Result<NodeIndex> {
        self.check_growth_point(action.growth_point)?;

        let index = self.nodes.len();
        self.nodes
            .push(InteriorNode::new(action.split_rule, action.edge_predictors));

        match action.growth_point {
            GrowthPointId::NewRoot => self.roots.push(index),
            GrowthPointId::ChildOf { node, branch } => {
                self.nodes[node].edge_mut(branch).set_target(index);
            }
        }

        log::debug!("Split {} into interior node {}", action.growth_point, index);
        Ok(index)
    }

    /// Sum of the edge values along the path `input` takes through every tree.
    pub fn predict<A: FeatureAccessor + ?Sized>(&self, input: &A) -> Result<Score> {
        let mut sum = 0.0;
        for &root in &self.roots {
            sum += self.walk_tree(root, input, |_, _| {})?;
        }
        Ok(sum)
    }

    /// Sum of the edge values along the path `input` takes through one tree.
    ///
    /// Fails with [`ForestError::UnknownTree`] if `root` is not a tree root.
    pub fn predict_tree<A: FeatureAccessor + ?Sized>(&self, input: &A, root: NodeIndex) -> Result<Score> {
        self.check_root(root)?;
        self.walk_tree(root, input, |_, _| {})
    }

    /// Which edge `input` takes at every interior node.
    ///
    /// The result has two entries per interior node in creation order,
    /// `[edge0_taken, edge1_taken]`. Nodes off the input's path are `[false, false]`.
    pub fn edge_indicator_vector<A: FeatureAccessor + ?Sized>(&self, input: &A) -> Result<Vec<bool>> {
        let mut indicators = Vec::new();
        self.fill_edge_indicator_vector(input, &mut indicators)?;
        Ok(indicators)
    }

    /// Same as [`edge_indicator_vector`](Self::edge_indicator_vector), writing
    /// into a caller-owned buffer that is resized to fit.
    pub fn fill_edge_indicator_vector<A: FeatureAccessor + ?Sized>(
        &self,
        input: &A,
        indicators: &mut Vec<bool>,
    ) -> Result<()> {
        indicators.clear();
        indicators.resize(self.num_edges(), false);
        for &root in &self.roots {
            self.walk_tree(root, input, |node, branch| {
                indicators[node * EDGES_PER_NODE + branch.index()] = true;
            })?;
        }
        Ok(())
    }

    /// Indices of the set entries of the edge indicator vector, ascending.
    ///
    /// Entry `2 * node + branch` is set for every edge on the input's path.
    pub fn active_edges<A: FeatureAccessor + ?Sized>(&self, input: &A) -> Result<SparseBinaryVector> {
        let mut active = Vec::new();
        for &root in &self.roots {
            self.walk_tree(root, input, |node, branch| {
                active.push(node * EDGES_PER_NODE + branch.index());
            })?;
        }
        // Trees interleave in the arena, so paths are not globally ordered.
        active.sort_unstable();
        SparseBinaryVector::from_indices(active)
    }

    /// Number of trees.
    pub fn num_trees(&self) -> usize {
        self.roots.len()
    }

    /// Number of interior nodes in the whole forest.
    pub fn num_interior_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the whole forest, always twice the node count.
    pub fn num_edges(&self) -> usize {
        EDGES_PER_NODE * self.nodes.len()
    }

    /// Number of interior nodes reachable from `root`, including the root.
    pub fn tree_num_interior_nodes(&self, root: NodeIndex) -> Result<usize> {
        Ok(self.tree_nodes(root)?.len())
    }

    /// Number of edges in the tree rooted at `root`.
    pub fn tree_num_edges(&self, root: NodeIndex) -> Result<usize> {
        Ok(EDGES_PER_NODE * self.tree_num_interior_nodes(root)?)
    }

    /// Interior nodes of the tree rooted at `root`, in depth-first preorder
    /// with the left subtree first.
    pub fn tree_nodes(&self, root: NodeIndex) -> Result<Vec<NodeIndex>> {
        self.check_root(root)?;

        let mut visited = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            visited.push(index);
            let node = &self.nodes[index];
            for branch in [Branch::Right, Branch::Left] {
                if let Some(child) = node.edge(branch).target() {
                    stack.push(child);
                }
            }
        }
        Ok(visited)
    }

    /// Root node indices in tree creation order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// All interior nodes in creation order.
    pub fn nodes(&self) -> &[InteriorNode<R, P>] {
        &self.nodes
    }

    /// The interior node at `index`.
    pub fn node(&self, index: NodeIndex) -> Option<&InteriorNode<R, P>> {
        self.nodes.get(index)
    }

    /// Returns true if `index` is the root of a tree.
    pub fn is_root(&self, index: NodeIndex) -> bool {
        // Each root is the newest node when created, so roots are sorted.
        self.roots.binary_search(&index).is_ok()
    }

    fn check_root(&self, root: NodeIndex) -> Result<()> {
        if self.is_root(root) {
            Ok(())
        } else {
            Err(ForestError::unknown_tree(root))
        }
    }

    /// Follows `input` from `root` to a terminal edge, calling `visit` for
    /// every node on the way with the branch taken, and returns the sum of
    /// the taken edges' values.
    fn walk_tree<A, F>(&self, root: NodeIndex, input: &A, mut visit: F) -> Result<Score>
    where
        A: FeatureAccessor + ?Sized,
        F: FnMut(NodeIndex, Branch),
    {
        let mut sum = 0.0;
        let mut current = root;
        loop {
            let node = &self.nodes[current];
            let branch = node.split_rule().evaluate(input)?;
            let edge = node.edge(branch);
            sum += edge.value();
            visit(current, branch);

            match edge.target() {
                Some(child) => current = child,
                None => break,
            }
        }
        log::trace!("Tree {} evaluated to {}", root, sum);
        Ok(sum)
    }
}

enum PrintFrame {
    Node { index: NodeIndex, depth: usize },
    Edge { index: NodeIndex, branch: Branch, depth: usize },
}

impl<R, P> fmt::Display for ForestPredictor<R, P>
where
    R: SplitRule + fmt::Display,
    P: EdgePredictor + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Forest: {} trees, {} interior nodes",
            self.num_trees(),
            self.num_interior_nodes()
        )?;

        for (tree, &root) in self.roots.iter().enumerate() {
            writeln!(f, "Tree {} (root {})", tree, root)?;
            let mut stack = vec![PrintFrame::Node { index: root, depth: 1 }];
            while let Some(frame) = stack.pop() {
                match frame {
                    PrintFrame::Node { index, depth } => {
                        writeln!(f, "{:indent$}node {}: {}", "", index, self.nodes[index].split_rule(), indent = 2 * depth)?;
                        for branch in [Branch::Right, Branch::Left] {
                            stack.push(PrintFrame::Edge { index, branch, depth: depth + 1 });
                        }
                    }
                    PrintFrame::Edge { index, branch, depth } => {
                        let edge = self.nodes[index].edge(branch);
                        match edge.target() {
                            Some(child) => {
                                writeln!(f, "{:indent$}[{}] {} -> node {}", "", branch, edge.predictor(), child, indent = 2 * depth)?;
                                stack.push(PrintFrame::Node { index: child, depth: depth + 1 });
                            }
                            None => writeln!(f, "{:indent$}[{}] {}", "", branch, edge.predictor(), indent = 2 * depth)?,
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::rules::{ConstantPredictor, ThresholdRule};
    use crate::forest::SimpleForestPredictor;

    fn action(growth_point: GrowthPointId, feature: usize, threshold: f64, values: [f64; 2]) -> SplitAction<ThresholdRule, ConstantPredictor> {
        SplitAction::new(
            growth_point,
            ThresholdRule::new(feature, threshold),
            [ConstantPredictor::new(values[0]), ConstantPredictor::new(values[1])],
        )
    }

    fn two_tree_forest() -> (SimpleForestPredictor, NodeIndex, NodeIndex) {
        let mut forest = SimpleForestPredictor::new();
        let tree_a = forest.split(action(forest.new_root_id(), 0, 0.3, [-1.0, 1.0])).unwrap();
        forest.split(action(forest.child_id(0, 0).unwrap(), 1, 0.6, [-2.0, 2.0])).unwrap();
        forest.split(action(forest.child_id(0, 1).unwrap(), 2, 0.9, [-4.0, 4.0])).unwrap();
        let tree_b = forest.split(action(forest.new_root_id(), 0, 0.2, [-3.0, 3.0])).unwrap();
        (forest, tree_a, tree_b)
    }

    #[test]
    fn test_empty_forest() {
        let forest = SimpleForestPredictor::new();
        assert_eq!(forest.num_trees(), 0);
        assert_eq!(forest.num_interior_nodes(), 0);
        assert_eq!(forest.num_edges(), 0);
        assert_eq!(forest.predict(&[1.0, 2.0]).unwrap(), 0.0);
        assert!(forest.edge_indicator_vector(&[1.0]).unwrap().is_empty());
    }

    #[test]
    fn test_split_returns_sequential_indices() {
        let (forest, tree_a, tree_b) = two_tree_forest();
        assert_eq!(tree_a, 0);
        assert_eq!(tree_b, 3);
        assert_eq!(forest.roots(), &[0, 3]);
        assert_eq!(forest.node(0).unwrap().edge(Branch::Left).target(), Some(1));
        assert_eq!(forest.node(0).unwrap().edge(Branch::Right).target(), Some(2));
        assert!(forest.node(3).unwrap().edge(Branch::Left).is_terminal());
    }

    #[test]
    fn test_child_id_validation() {
        let (forest, _, _) = two_tree_forest();

        assert!(matches!(forest.child_id(0, 0), Err(ForestError::GrowthPointInvalid { node: 0, edge: 0, .. })));
        assert!(matches!(forest.child_id(3, 2), Err(ForestError::GrowthPointInvalid { edge: 2, .. })));
        assert!(matches!(forest.child_id(4, 0), Err(ForestError::GrowthPointInvalid { node: 4, .. })));
        assert_eq!(
            forest.child_id(3, 1).unwrap(),
            GrowthPointId::ChildOf { node: 3, branch: Branch::Right }
        );
    }

    #[test]
    fn test_stale_growth_point_leaves_forest_unchanged() {
        let (mut forest, _, _) = two_tree_forest();
        let growth_point = forest.child_id(1, 1).unwrap();
        forest.split(action(growth_point, 0, 0.5, [0.5, 0.5])).unwrap();
        let before = forest.clone();

        let err = forest.split(action(growth_point, 0, 0.5, [0.5, 0.5])).unwrap_err();
        assert!(matches!(err, ForestError::GrowthPointInvalid { node: 1, edge: 1, .. }));
        assert!(err.is_recoverable());
        assert_eq!(forest, before);
    }

    #[test]
    fn test_split_out_of_range_parent() {
        let mut forest = SimpleForestPredictor::new();
        let stale = GrowthPointId::ChildOf { node: 0, branch: Branch::Left };
        assert!(!forest.is_splittable(stale));
        assert!(forest.split(action(stale, 0, 0.0, [1.0, 1.0])).is_err());
        assert_eq!(forest.num_interior_nodes(), 0);
        assert_eq!(forest.num_trees(), 0);
    }

    #[test]
    fn test_structural_counts() {
        let (forest, tree_a, tree_b) = two_tree_forest();
        assert_eq!(forest.num_trees(), 2);
        assert_eq!(forest.num_interior_nodes(), 4);
        assert_eq!(forest.num_edges(), 8);
        assert_eq!(forest.tree_num_interior_nodes(tree_a).unwrap(), 3);
        assert_eq!(forest.tree_num_edges(tree_a).unwrap(), 6);
        assert_eq!(forest.tree_num_interior_nodes(tree_b).unwrap(), 1);
        assert_eq!(forest.tree_num_edges(tree_b).unwrap(), 2);
        assert_eq!(forest.tree_nodes(tree_a).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_tree() {
        let (forest, _, _) = two_tree_forest();
        assert!(matches!(forest.predict_tree(&[0.0], 1), Err(ForestError::UnknownTree { root: 1 })));
        assert!(matches!(forest.tree_num_edges(99), Err(ForestError::UnknownTree { root: 99 })));
        assert!(!forest.is_root(2));
    }

    #[test]
    fn test_split_edge_keeps_its_contribution() {
        let mut forest = SimpleForestPredictor::new();
        let root = forest.split(action(forest.new_root_id(), 0, 0.0, [10.0, 20.0])).unwrap();
        assert_eq!(forest.predict(&[-1.0]).unwrap(), 10.0);

        forest.split(action(forest.child_id(root, 0).unwrap(), 1, 0.0, [1.0, 2.0])).unwrap();
        assert_eq!(forest.predict(&[-1.0, -1.0]).unwrap(), 11.0);
        assert_eq!(forest.predict(&[-1.0, 1.0]).unwrap(), 12.0);
        assert_eq!(forest.predict(&[1.0, 1.0]).unwrap(), 20.0);
    }

    #[test]
    fn test_edge_indicator_vector() {
        let (forest, _, _) = two_tree_forest();
        let indicators = forest.edge_indicator_vector(&[0.25, 0.7, 0.0]).unwrap();
        assert_eq!(indicators, vec![true, false, false, true, false, false, false, true]);

        let active = forest.active_edges(&[0.25, 0.7, 0.0]).unwrap();
        assert_eq!(active.indices(), &[0, 3, 7]);
    }

    #[test]
    fn test_fill_edge_indicator_vector_reuses_buffer() {
        let (forest, _, _) = two_tree_forest();
        let mut buffer = vec![true; 3];
        forest.fill_edge_indicator_vector(&[0.5, 0.7, 1.0], &mut buffer).unwrap();
        assert_eq!(buffer, vec![false, true, false, false, false, true, false, true]);
    }

    #[test]
    fn test_display_outline() {
        let (forest, _, _) = two_tree_forest();
        let printed = forest.to_string();
        assert!(printed.starts_with("Forest: 2 trees, 4 interior nodes"));
        assert!(printed.contains("Tree 1 (root 3)"));
        assert!(printed.contains("node 1: x[1] <= 0.6"));
        assert!(printed.contains("[0] -1 -> node 1"));
        assert!(printed.contains("[1] +3"));
    }
}
