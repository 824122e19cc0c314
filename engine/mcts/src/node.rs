//! MCTS tree node representation.
//!
//! Each node owns a snapshot of the position reached by playing `mv` from its
//! parent, together with the visit statistics used for UCT selection.

use games_uttt::{GameState, Move};

/// Smoothing term that keeps the UCT formula finite for unvisited nodes.
pub const EPSILON: f64 = 1e-6;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led here from the parent (None for root)
    pub mv: Option<Move>,

    /// Position at this node
    pub state: GameState,

    /// Number of rollouts backpropagated through this node
    pub visit_count: u32,

    /// Sum of rollout returns backpropagated through this node
    pub score_sum: f64,

    /// Static evaluation of `state`, computed once when the node is created
    pub heuristic: f64,

    /// Children in expansion order (best static score first).
    /// Empty until node is expanded.
    pub children: Vec<(Move, NodeId)>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(state: GameState, heuristic: f64) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            state,
            visit_count: 0,
            score_sum: 0.0,
            heuristic,
            children: Vec::new(),
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, mv: Move, state: GameState, heuristic: f64) -> Self {
        Self {
            parent,
            mv: Some(mv),
            state,
            visit_count: 0,
            score_sum: 0.0,
            heuristic,
            children: Vec::new(),
        }
    }

    /// Smoothed mean return: `score_sum / (visit_count + EPSILON)`.
    /// Effectively 0.0 for unvisited nodes.
    #[inline]
    pub fn mean_score(&self) -> f64 {
        self.score_sum / (self.visit_count as f64 + EPSILON)
    }

    /// UCT score used by the parent when choosing which child to descend into:
    ///
    /// `mean + c * sqrt(ln(N_parent + eps) / (N + eps)) + heuristic`
    ///
    /// Takes the pre-computed `ln(N_parent + eps)` so siblings share one log.
    /// A negative log (parent never visited) contributes no exploration.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f64, c: f64) -> f64 {
        let exploration =
            (parent_visits_ln.max(0.0) / (self.visit_count as f64 + EPSILON)).sqrt();
        self.mean_score() + c * exploration + self.heuristic
    }

    /// Convenience form of [`uct_score`](Self::uct_score) taking the raw
    /// parent visit count.
    #[inline]
    pub fn uct_score_with_parent_visits(&self, parent_visits: u32, c: f64) -> f64 {
        self.uct_score((parent_visits as f64 + EPSILON).ln(), c)
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_expanded()
    }
}
