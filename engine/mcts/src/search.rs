//! MCTS search implementation.
//!
//! Implements the time-boxed search loop:
//! 1. Selection: descend by UCT plus the cached static evaluation
//! 2. Expansion: keep the best-scored legal moves as children
//! 3. Simulation: random playout, summing the evaluator after every move
//! 4. Backpropagation: add the playout return to every ancestor

use std::time::{Duration, Instant};

use games_uttt::{GameResult, GameState, Move};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::Evaluator;
use crate::node::NodeId;
use crate::tactics;
use crate::tree::{MctsTree, TreeStats};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),
}

/// How the returned move was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Fixed first-move preference.
    Opening,
    /// The move wins the game outright.
    GlobalWin,
    /// The move wins a zone.
    ZoneWin,
    /// The move stops an opponent zone win.
    Block,
    /// Best root child after searching.
    Search,
    /// The search produced no children; a random legal move was played.
    RandomFallback,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Move to play
    pub mv: Move,

    pub source: MoveSource,

    /// Number of completed iterations (0 when a short-circuit fired)
    pub iterations: u32,

    /// Mean return of the chosen root child (0.0 without search)
    pub value: f64,

    /// Shape of the tree at the end of the search
    pub tree: TreeStats,

    /// Wall-clock time spent choosing the move
    pub elapsed: Duration,
}

impl SearchResult {
    fn without_search(mv: Move, source: MoveSource, elapsed: Duration) -> Self {
        Self {
            mv,
            source,
            iterations: 0,
            value: 0.0,
            tree: TreeStats::default(),
            elapsed,
        }
    }
}

/// MCTS search state.
pub struct MctsSearch<'a, E: Evaluator> {
    tree: MctsTree,
    evaluator: &'a E,
    config: &'a MctsConfig,
    iterations: u32,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    /// Create a new MCTS search rooted at the given position.
    pub fn new(
        evaluator: &'a E,
        config: &'a MctsConfig,
        state: GameState,
    ) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        if state.available_moves().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let heuristic = evaluator.score(&state) as f64;
        Ok(Self {
            tree: MctsTree::new(state, heuristic),
            evaluator,
            config,
            iterations: 0,
        })
    }

    /// Run iterations until the deadline or the iteration cap, then pick the
    /// root child with the best mean return.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let deadline = start + self.config.time_budget;

        loop {
            if let Some(max) = self.config.max_iterations {
                if self.iterations >= max {
                    break;
                }
            }
            // A zero budget leaves the iteration cap in charge
            if !self.config.time_budget.is_zero() && Instant::now() >= deadline {
                break;
            }
            self.iterate(rng);
        }

        let (mv, source, value) = match self.tree.best_move() {
            Some((mv, child)) => (mv, MoveSource::Search, self.tree.get(child).mean_score()),
            None => {
                let root_state = self.tree.get(self.tree.root()).state;
                let mv = root_state.random_move(rng).ok_or(SearchError::NoLegalMoves)?;
                (mv, MoveSource::RandomFallback, 0.0)
            }
        };

        Ok(SearchResult {
            mv,
            source,
            iterations: self.iterations,
            value,
            tree: self.tree.stats(),
            elapsed: start.elapsed(),
        })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(&mut self, rng: &mut ChaCha20Rng) {
        let leaf_id = self.select();

        if !self.tree.get(leaf_id).state.is_terminal() {
            self.expand_node(leaf_id);
        }

        let leaf = self.tree.get(leaf_id);
        let sim_id = leaf
            .children
            .choose(rng)
            .map(|(_, id)| *id)
            .unwrap_or(leaf_id);

        let value = self.rollout(self.tree.get(sim_id).state, rng);
        self.tree.backpropagate(sim_id, value);
        self.iterations += 1;

        trace!(
            leaf = leaf_id.0,
            simulated = sim_id.0,
            value = value,
            "MCTS iteration complete"
        );
    }

    /// Descend from the root to a childless node.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_leaf() {
                break;
            }

            let c = self.config.exploration.constant(node.state.move_number());
            match self.tree.select_child(current, c) {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        current
    }

    /// Score every legal move against this node's own position and keep the
    /// best `expansion_cap` as children.
    fn expand_node(&mut self, node_id: NodeId) {
        let state = self.tree.get(node_id).state;
        let ordering = &self.config.ordering;

        let mut candidates: Vec<(Move, GameState, i32, i32)> = state
            .available_moves()
            .into_iter()
            .map(|mv| {
                let next = state.with_move(mv);
                let static_score = self.evaluator.score(&next);
                let rank = static_score + tactics::ordering_adjustment(ordering, mv, &next);
                (mv, next, static_score, rank)
            })
            .collect();

        // Stable: equal ranks keep move-generation order
        candidates.sort_by(|a, b| b.3.cmp(&a.3));

        for (mv, next, static_score, _) in candidates.into_iter().take(self.config.expansion_cap) {
            self.tree.add_child(node_id, mv, next, static_score as f64);
        }
    }

    /// Uniform random playout, accumulating the evaluator after every move,
    /// plus the terminal bonus.
    fn rollout(&self, mut state: GameState, rng: &mut ChaCha20Rng) -> f64 {
        let mut total = 0.0;

        while let Some(mv) = state.random_move(rng) {
            state.apply_move(mv);
            total += self.evaluator.score(&state) as f64;
        }

        total
            + match state.outcome() {
                GameResult::Win(_) => self.config.rollout_bonus.win,
                GameResult::Tie => self.config.rollout_bonus.tie,
                GameResult::Active => 0.0,
            }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

/// Choose a move for `state`: short-circuits first, then the search loop.
pub fn run_mcts<E: Evaluator>(
    evaluator: &E,
    config: &MctsConfig,
    state: &GameState,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let start = Instant::now();
    let moves = state.available_moves();
    if moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    if let Some((mv, source)) = tactics::pre_search_move(state, &moves, config) {
        debug!(
            move_number = state.move_number(),
            mv = %mv,
            source = ?source,
            "Move chosen without search"
        );
        return Ok(SearchResult::without_search(mv, source, start.elapsed()));
    }

    let mut search = MctsSearch::new(evaluator, config, *state)?;
    let mut result = search.run(rng)?;
    result.elapsed = start.elapsed();

    debug!(
        move_number = state.move_number(),
        mv = %result.mv,
        source = ?result.source,
        iterations = result.iterations,
        nodes = result.tree.total_nodes,
        depth = result.tree.max_depth,
        value = result.value,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "MCTS search complete"
    );

    Ok(result)
}
