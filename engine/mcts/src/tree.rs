//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. A tree lives for a single search.

use games_uttt::{GameState, Move};

use crate::node::{MctsNode, NodeId, EPSILON};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at the given position.
    pub fn new(root_state: GameState, root_heuristic: f64) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state, root_heuristic)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCT score.
    /// The first child wins ties; NaN scores never displace a candidate.
    pub fn select_child(&self, node_id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // One log per selection step, shared by all siblings
        let parent_visits_ln = (node.visit_count as f64 + EPSILON).ln();

        first_max_by_score(
            node.children
                .iter()
                .map(|(_, id)| (*id, self.get(*id).uct_score(parent_visits_ln, c))),
        )
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        mv: Move,
        state: GameState,
        heuristic: f64,
    ) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, mv, state, heuristic));
        self.get_mut(parent_id).children.push((mv, child_id));
        child_id
    }

    /// Backpropagate a rollout return from a node up to the root.
    ///
    /// Every ancestor receives the same value: scores are kept from player
    /// A's point of view at every depth.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.score_sum += value;
            current_id = node.parent;
        }
    }

    /// Root child with the best mean score, first one on ties.
    /// Returns (move, child id) or None if the root was never expanded.
    pub fn best_move(&self) -> Option<(Move, NodeId)> {
        let root = self.get(self.root);
        let best = first_max_by_score(
            root.children
                .iter()
                .map(|(_, id)| (*id, self.get(*id).mean_score())),
        )?;
        Some((self.get(best).mv?, best))
    }

    /// Sum of the visit counts of the root's children.
    pub fn root_child_visits(&self) -> u32 {
        self.get(self.root)
            .children
            .iter()
            .map(|(_, id)| self.get(*id).visit_count)
            .sum()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_score: root.mean_score(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// First id with the strictly greatest score.
fn first_max_by_score(candidates: impl Iterator<Item = (NodeId, f64)>) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (id, score) in candidates {
        match best {
            None => best = Some((id, score)),
            Some((_, best_score)) if score > best_score || best_score.is_nan() => {
                best = Some((id, score))
            }
            _ => {}
        }
    }
    best.map(|(id, _)| id)
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, Default)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_score: f64,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_children(n: usize) -> (MctsTree, Vec<NodeId>) {
        let root_state = GameState::new();
        let mut tree = MctsTree::new(root_state, 0.0);
        let root = tree.root();
        let ids = root_state
            .available_moves()
            .into_iter()
            .take(n)
            .map(|mv| tree.add_child(root, mv, root_state.with_move(mv), 0.0))
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(GameState::new(), 90.0);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.state, GameState::new());
    }

    #[test]
    fn test_add_child() {
        let state = GameState::new();
        let mut tree = MctsTree::new(state, 0.0);
        let mv = Move::new(4, 4);

        let child_id = tree.add_child(tree.root(), mv, state.with_move(mv), 12.0);

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(mv, NodeId(1))]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.mv, Some(mv));
        assert_eq!(child.state.move_number(), 1);
        assert!((child.heuristic - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_backpropagate_does_not_negate() {
        let (mut tree, ids) = tree_with_children(1);
        let child_id = ids[0];
        let grand_state = tree.get(child_id).state;
        let grand_mv = grand_state.available_moves()[0];
        let grandchild_id =
            tree.add_child(child_id, grand_mv, grand_state.with_move(grand_mv), 0.0);

        tree.backpropagate(grandchild_id, 7.5);

        for id in [grandchild_id, child_id, tree.root()] {
            assert_eq!(tree.get(id).visit_count, 1);
            assert!((tree.get(id).score_sum - 7.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_select_child_prefers_heuristic() {
        let (mut tree, ids) = tree_with_children(3);
        tree.get_mut(ids[1]).heuristic = 50.0;

        let best = tree.select_child(tree.root(), 2.0).unwrap();
        assert_eq!(best, ids[1]);
    }

    #[test]
    fn test_select_child_ties_keep_first() {
        let (tree, ids) = tree_with_children(4);
        assert_eq!(tree.select_child(tree.root(), 2.0), Some(ids[0]));
    }

    #[test]
    fn test_select_child_explores_unvisited() {
        let (mut tree, ids) = tree_with_children(2);
        tree.backpropagate(ids[0], 1.0);

        // The visited child has mean ~1.0, but the unvisited one carries a
        // huge exploration bonus.
        assert_eq!(tree.select_child(tree.root(), 2.0), Some(ids[1]));
    }

    #[test]
    fn test_select_child_none_without_children() {
        let tree = MctsTree::new(GameState::new(), 0.0);
        assert_eq!(tree.select_child(tree.root(), 2.0), None);
    }

    #[test]
    fn test_best_move_by_mean_score() {
        let (mut tree, ids) = tree_with_children(3);
        tree.backpropagate(ids[0], 10.0);
        tree.backpropagate(ids[0], 10.0);
        tree.backpropagate(ids[1], 30.0);
        tree.backpropagate(ids[2], 5.0);

        let (mv, id) = tree.best_move().unwrap();
        assert_eq!(id, ids[1]);
        assert_eq!(Some(mv), tree.get(ids[1]).mv);
        assert_eq!(tree.root_child_visits(), 4);
        assert_eq!(tree.get(tree.root()).visit_count, 4);
    }

    #[test]
    fn test_best_move_none_when_unexpanded() {
        let tree = MctsTree::new(GameState::new(), 0.0);
        assert!(tree.best_move().is_none());
    }

    #[test]
    fn test_first_max_skips_nan() {
        let ids = [NodeId(1), NodeId(2), NodeId(3)];
        let best = first_max_by_score(
            [(ids[0], f64::NAN), (ids[1], 1.0), (ids[2], 1.0)].into_iter(),
        );
        assert_eq!(best, Some(ids[1]));
    }

    #[test]
    fn test_tree_stats() {
        let (tree, _) = tree_with_children(2);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.root_visits, 0);
    }
}
