//! Heuristic-guided Monte Carlo Tree Search for Ultimate Tic-Tac-Toe.
//!
//! This crate chooses moves for positions from the `games-uttt` rules engine
//! within a wall-clock budget.
//!
//! # Overview
//!
//! Before searching, a few one-ply tactics may answer directly: a fixed
//! opening reply, a move that wins the game, a move that wins a zone, or a
//! move that blocks an opponent zone win. Otherwise each iteration runs four
//! phases:
//!
//! 1. **Selection**: descend by UCT plus the child's cached static score,
//!    with an exploration constant that shrinks as the game goes on
//! 2. **Expansion**: score every legal move with the evaluator and keep only
//!    the best few as children
//! 3. **Simulation**: play uniformly random moves to the end, summing the
//!    evaluator after each one, plus a bonus for a decided game
//! 4. **Backpropagation**: add that return to every ancestor
//!
//! When the budget runs out the root child with the best mean return is
//! played.
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::GameState;
//! use mcts::{run_mcts, HeuristicEvaluator, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let config = MctsConfig::for_testing().with_max_iterations(Some(50));
//! let evaluator = HeuristicEvaluator::new(config.weights.clone());
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let state = GameState::new();
//! let result = run_mcts(&evaluator, &config, &state, &mut rng).unwrap();
//!
//! assert!(state.available_moves().contains(&result.mv));
//! println!("Best move: {} ({:?})", result.mv, result.source);
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig`] controls search behavior:
//!
//! - `time_budget`: wall-clock time per move (default: 100ms)
//! - `max_iterations`: optional hard cap, for reproducible runs
//! - `expansion_cap`: children kept per expanded node (default: 5)
//! - `exploration`: UCT constant per game phase
//! - `opening`, `short_circuits`, `ordering`: tactical behaviour
//! - `weights`: evaluator term weights
//!
//! Three named [`Profile`]s bundle these: `canonical`, `tactical` and
//! `positional`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MctsAgent                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  tactics    │  │ MctsSearch  │  │ HeuristicEvaluator  │  │
//! │  │ (one-ply)   │  │  MctsTree   │  │  (static score)     │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────┬──────────┘  │
//! │         │                │                    │             │
//! │         ▼                ▼                    ▼             │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │       select → expand → rollout → backpropagate      │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tactics;
pub mod tree;

// Re-export main types
pub use agent::{Agent, MctsAgent, RandomAgent};
pub use config::{
    ExplorationSchedule, MctsConfig, MoveOrdering, OpeningPreference, Profile, ProfileError,
    RolloutBonus, ShortCircuits,
};
pub use evaluator::{EvalWeights, Evaluator, HeuristicEvaluator, ZeroEvaluator};
pub use node::{MctsNode, NodeId};
pub use search::{run_mcts, MctsSearch, MoveSource, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
