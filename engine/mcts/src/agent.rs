//! Move-choosing agents built on top of the search.

use std::fmt;

use games_uttt::{GameState, Move};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::{MctsConfig, Profile};
use crate::evaluator::HeuristicEvaluator;
use crate::search::{run_mcts, SearchError, SearchResult};

/// Anything that can pick a move for the side to move.
pub trait Agent {
    /// Short label used in logs and match statistics.
    fn name(&self) -> &str;

    /// Choose a legal move for `state`.
    ///
    /// Fails with [`SearchError::NoLegalMoves`] on a finished position.
    fn choose_move(&mut self, state: &GameState) -> Result<Move, SearchError>;
}

/// Heuristic MCTS player.
pub struct MctsAgent {
    name: String,
    config: MctsConfig,
    evaluator: HeuristicEvaluator,
    rng: ChaCha20Rng,
    last_result: Option<SearchResult>,
}

impl MctsAgent {
    /// Agent with an entropy-seeded RNG.
    pub fn new(name: impl Into<String>, config: MctsConfig) -> Self {
        Self::with_rng(name, config, ChaCha20Rng::from_entropy())
    }

    /// Agent whose playouts are reproducible for a given seed.
    pub fn with_seed(name: impl Into<String>, config: MctsConfig, seed: u64) -> Self {
        Self::with_rng(name, config, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Agent using the named profile's config, named after the profile.
    pub fn from_profile(profile: Profile, seed: u64) -> Self {
        Self::with_seed(profile.as_str(), MctsConfig::for_profile(profile), seed)
    }

    fn with_rng(name: impl Into<String>, config: MctsConfig, rng: ChaCha20Rng) -> Self {
        let evaluator = HeuristicEvaluator::new(config.weights.clone());
        Self {
            name: name.into(),
            config,
            evaluator,
            rng,
            last_result: None,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Mutable access, e.g. to change the time budget between games.
    pub fn config_mut(&mut self) -> &mut MctsConfig {
        &mut self.config
    }

    /// Details of the most recent successful `choose_move`.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }
}

impl fmt::Debug for MctsAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MctsAgent")
            .field("name", &self.name)
            .field("time_budget", &self.config.time_budget)
            .field("max_iterations", &self.config.max_iterations)
            .field("expansion_cap", &self.config.expansion_cap)
            .finish_non_exhaustive()
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &GameState) -> Result<Move, SearchError> {
        if self.evaluator.weights() != &self.config.weights {
            self.evaluator = HeuristicEvaluator::new(self.config.weights.clone());
        }
        let result = run_mcts(&self.evaluator, &self.config, state, &mut self.rng)?;
        let mv = result.mv;
        self.last_result = Some(result);
        Ok(mv)
    }
}

/// Uniformly random legal moves. Baseline opponent.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, state: &GameState) -> Result<Move, SearchError> {
        state.random_move(&mut self.rng).ok_or(SearchError::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MoveSource;
    use games_uttt::GameResult;
    use std::time::Duration;

    fn quick(profile: Profile) -> MctsConfig {
        MctsConfig::for_profile(profile)
            .with_time_budget(Duration::from_secs(10))
            .with_max_iterations(Some(10))
    }

    fn play(a: &mut dyn Agent, b: &mut dyn Agent) -> GameState {
        let mut state = GameState::new();
        while !state.is_terminal() {
            let agent: &mut dyn Agent = if state.move_number() % 2 == 0 {
                &mut *a
            } else {
                &mut *b
            };
            let mv = agent.choose_move(&state).unwrap();
            assert!(state.available_moves().contains(&mv));
            state.apply_move(mv);
        }
        state
    }

    #[test]
    fn test_mcts_agent_opens_center() {
        let mut agent = MctsAgent::with_seed("canonical", quick(Profile::Canonical), 1);
        let mv = agent.choose_move(&GameState::new()).unwrap();

        assert_eq!(mv, Move::new(4, 4));
        assert_eq!(agent.last_result().unwrap().source, MoveSource::Opening);
    }

    #[test]
    fn test_tactical_agent_opens_corner() {
        let mut agent = MctsAgent::from_profile(Profile::Tactical, 1);
        assert_eq!(agent.name(), "tactical");
        assert_eq!(agent.choose_move(&GameState::new()).unwrap(), Move::new(3, 3));
    }

    #[test]
    fn test_random_agent_is_legal_and_seeded() {
        let state = GameState::new().with_move(Move::new(1, 7));
        let mut a = RandomAgent::with_seed(3);
        let mut b = RandomAgent::with_seed(3);

        let mv = a.choose_move(&state).unwrap();
        assert!(state.available_moves().contains(&mv));
        assert_eq!(mv, b.choose_move(&state).unwrap());
    }

    #[test]
    fn test_agents_error_on_finished_game() {
        let mut state = GameState::new();
        for zx in 0..3 {
            state.set_zone(zx, 1, games_uttt::ZoneStatus::Won(games_uttt::Player::B));
        }

        let mut random = RandomAgent::with_seed(0);
        assert!(matches!(random.choose_move(&state), Err(SearchError::NoLegalMoves)));

        let mut mcts = MctsAgent::with_seed("m", quick(Profile::Canonical), 0);
        assert!(matches!(mcts.choose_move(&state), Err(SearchError::NoLegalMoves)));
        assert!(mcts.last_result().is_none());
    }

    #[test]
    fn test_mcts_vs_random_completes() {
        let mut mcts = MctsAgent::with_seed("canonical", quick(Profile::Canonical), 8);
        let mut random = RandomAgent::with_seed(8);

        let state = play(&mut mcts, &mut random);
        assert_ne!(state.outcome(), GameResult::Active);
    }

    #[test]
    fn test_config_changes_take_effect() {
        let mut agent = MctsAgent::with_seed("p", quick(Profile::Canonical), 2);
        agent.config_mut().weights = crate::evaluator::EvalWeights::positional();

        let state = GameState::new().with_move(Move::new(4, 4));
        agent.choose_move(&state).unwrap();
        assert_eq!(agent.evaluator.weights(), &crate::evaluator::EvalWeights::positional());
    }

    #[test]
    fn test_agent_uses_configured_weights() {
        let weights = crate::evaluator::EvalWeights {
            macro_center: 75,
            ..crate::evaluator::EvalWeights::canonical()
        };
        let config = quick(Profile::Canonical).with_weights(weights.clone());
        let mut agent = MctsAgent::with_seed("custom", config, 4);
        assert_eq!(agent.evaluator.weights(), &weights);

        let state = GameState::new().with_move(Move::new(4, 4));
        let mv = agent.choose_move(&state).unwrap();
        assert!(state.available_moves().contains(&mv));
        assert_eq!(agent.evaluator.weights(), &weights);
    }

    #[test]
    fn test_debug_output() {
        let agent = MctsAgent::with_seed("dbg", MctsConfig::default(), 0);
        let debug = format!("{agent:?}");
        assert!(debug.contains("MctsAgent"));
        assert!(debug.contains("dbg"));
    }
}
