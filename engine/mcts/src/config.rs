//! Search configuration and named agent profiles.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::evaluator::EvalWeights;

/// Error returned when a profile name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown profile '{0}', expected one of canonical, tactical, positional")]
pub struct ProfileError(pub String);

/// Named bundles of evaluator weights and search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    /// Seven-term evaluator, all tactical short-circuits, cautious endgame.
    #[default]
    Canonical,
    /// Adds macro-centre control and threat-aware move ordering.
    Tactical,
    /// Alternative cell table, heavy macroboard pattern weighting.
    Positional,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Canonical, Profile::Tactical, Profile::Positional];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Canonical => "canonical",
            Profile::Tactical => "tactical",
            Profile::Positional => "positional",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" => Ok(Profile::Canonical),
            "tactical" => Ok(Profile::Tactical),
            "positional" => Ok(Profile::Positional),
            _ => Err(ProfileError(s.to_string())),
        }
    }
}

/// Exploration constant as a function of the move number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationSchedule {
    /// Constant used while the move number is below `opening_until`.
    pub opening: f64,
    pub opening_until: u32,
    /// Constant used while the move number is below `midgame_until`.
    pub midgame: f64,
    pub midgame_until: u32,
    /// Constant used for the rest of the game.
    pub endgame: f64,
}

impl ExplorationSchedule {
    /// Exploration constant for a node whose state has `move_number` marks.
    pub fn constant(&self, move_number: u32) -> f64 {
        if move_number < self.opening_until {
            self.opening
        } else if move_number < self.midgame_until {
            self.midgame
        } else {
            self.endgame
        }
    }

    /// The same constant at every stage.
    pub fn fixed(c: f64) -> Self {
        Self {
            opening: c,
            opening_until: 0,
            midgame: c,
            midgame_until: 0,
            endgame: c,
        }
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self {
            opening: 2.0,
            opening_until: 20,
            midgame: std::f64::consts::SQRT_2,
            midgame_until: 40,
            endgame: 0.5,
        }
    }
}

/// Fixed reply for the very first move of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpeningPreference {
    /// Search the opening like any other position.
    None,
    /// Play the centre cell (4, 4).
    #[default]
    Center,
    /// Play the first legal corner of the centre zone.
    Corners,
}

/// One-ply tactical checks run before the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortCircuits {
    /// Take a move that wins the whole game.
    pub global_win: bool,
    /// Take the first move that wins a zone.
    pub zone_win: bool,
    /// Take the first move that stops the opponent winning a zone.
    pub block: bool,
}

impl ShortCircuits {
    pub fn all() -> Self {
        Self {
            global_win: true,
            zone_win: true,
            block: true,
        }
    }

    pub fn none() -> Self {
        Self {
            global_win: false,
            zone_win: false,
            block: false,
        }
    }
}

impl Default for ShortCircuits {
    fn default() -> Self {
        Self::all()
    }
}

/// Adjustments applied to candidate scores when a node is expanded.
///
/// A zero weight disables the corresponding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOrdering {
    /// Subtracted when the move closes the zone it was played in.
    pub decided_zone_penalty: i32,
    /// Subtracted per opponent reply that would win a zone.
    pub immediate_threat_weight: i32,
    /// Subtracted per threat found by the deeper scan.
    pub future_threat_weight: i32,
    /// Plies searched by the deeper threat scan.
    pub threat_lookahead: u32,
}

impl MoveOrdering {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn tactical() -> Self {
        Self {
            decided_zone_penalty: 50,
            immediate_threat_weight: 10,
            future_threat_weight: 5,
            threat_lookahead: 2,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.decided_zone_penalty != 0
            || self.immediate_threat_weight != 0
            || (self.future_threat_weight != 0 && self.threat_lookahead > 0)
    }
}

/// Bonus added to a rollout's accumulated score at the terminal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutBonus {
    /// Added when either side has won the macroboard.
    pub win: f64,
    pub tie: f64,
}

impl Default for RolloutBonus {
    fn default() -> Self {
        Self {
            win: 10.0,
            tie: 5.0,
        }
    }
}

/// Configuration for one MCTS agent.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget for the search loop.
    pub time_budget: Duration,

    /// Optional cap on search iterations. The loop stops at whichever of the
    /// cap or the deadline comes first.
    pub max_iterations: Option<u32>,

    /// Number of best-scored moves kept as children when a node is expanded.
    pub expansion_cap: usize,

    pub exploration: ExplorationSchedule,
    pub opening: OpeningPreference,
    pub short_circuits: ShortCircuits,
    pub ordering: MoveOrdering,
    pub rollout_bonus: RolloutBonus,

    /// Static evaluator weights.
    pub weights: EvalWeights,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(100),
            max_iterations: None,
            expansion_cap: 5,
            exploration: ExplorationSchedule::default(),
            opening: OpeningPreference::Center,
            short_circuits: ShortCircuits::all(),
            ordering: MoveOrdering::disabled(),
            rollout_bonus: RolloutBonus::default(),
            weights: EvalWeights::canonical(),
        }
    }
}

impl MctsConfig {
    /// Configuration for a named profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Canonical => Self::default(),
            Profile::Tactical => Self {
                exploration: ExplorationSchedule {
                    endgame: std::f64::consts::SQRT_2,
                    ..ExplorationSchedule::default()
                },
                opening: OpeningPreference::Corners,
                ordering: MoveOrdering::tactical(),
                weights: EvalWeights::tactical(),
                ..Self::default()
            },
            Profile::Positional => Self {
                short_circuits: ShortCircuits {
                    block: false,
                    ..ShortCircuits::all()
                },
                weights: EvalWeights::positional(),
                ..Self::default()
            },
        }
    }

    /// Fast deterministic config for tests: iteration-capped with a generous
    /// deadline so the cap is what ends the search.
    pub fn for_testing() -> Self {
        Self {
            time_budget: Duration::from_secs(10),
            max_iterations: Some(200),
            ..Self::default()
        }
    }

    /// Builder pattern: set the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Builder pattern: cap the number of iterations (`None` for no cap).
    pub fn with_max_iterations(mut self, max: Option<u32>) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_expansion_cap(mut self, cap: usize) -> Self {
        self.expansion_cap = cap;
        self
    }

    pub fn with_opening(mut self, opening: OpeningPreference) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_short_circuits(mut self, short_circuits: ShortCircuits) -> Self {
        self.short_circuits = short_circuits;
        self
    }

    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check the parameters the search relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.expansion_cap == 0 {
            return Err("expansion_cap must be at least 1".into());
        }
        if self.time_budget.is_zero() && self.max_iterations.is_none() {
            return Err("time_budget must be non-zero".into());
        }
        let c = &self.exploration;
        if [c.opening, c.midgame, c.endgame]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err("exploration constants must be finite and non-negative".into());
        }
        Ok(())
    }
}
