//! Static position evaluation.
//!
//! The evaluator scores a position without searching it. Scores are always
//! from [`Player::A`]'s point of view: positive favours A, negative favours B.
//! The search uses it three ways: to rank candidate moves when expanding a
//! node, as a bias term during selection, and as the per-move reward summed
//! along a rollout.

use games_uttt::{GameResult, GameState, Player, ZoneStatus, BOARD_SIZE, LINES, ZONE_SIZE};

/// Trait for static position evaluators.
pub trait Evaluator: Send + Sync {
    /// Score a position. Higher is better for player A.
    fn score(&self, state: &GameState) -> i32;
}

/// Evaluator that scores every position as zero.
///
/// Useful for exercising search statistics without heuristic bias.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEvaluator;

impl Evaluator for ZeroEvaluator {
    fn score(&self, _state: &GameState) -> i32 {
        0
    }
}

/// Positional weight of each cell, indexed `[x][y]`.
pub type CellTable = [[i32; BOARD_SIZE]; BOARD_SIZE];

/// Cell table favouring the macro-centre ring and zone corners.
pub const CANONICAL_CELL_TABLE: CellTable = [
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 2, 2, 4, 2, 4, 2, 2, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 4, 2, 5, 3, 5, 2, 4, 2],
    [3, 2, 3, 3, 1, 3, 3, 2, 3],
    [2, 4, 2, 5, 3, 5, 2, 4, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 2, 2, 4, 2, 4, 2, 2, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
];

/// Cell table that also discounts the centres of the outer zones.
pub const POSITIONAL_CELL_TABLE: CellTable = [
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 1, 2, 4, 1, 4, 2, 1, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 4, 2, 5, 3, 5, 2, 4, 2],
    [3, 1, 3, 3, 1, 3, 3, 1, 3],
    [2, 4, 2, 5, 3, 5, 2, 4, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
    [2, 1, 2, 4, 2, 4, 2, 1, 2],
    [3, 2, 3, 2, 3, 2, 3, 2, 3],
];

/// Corner-anchored cell pairs inside a zone, as local `(x, y)` coordinates.
/// A pair with one mark and one empty cell counts as a combo.
pub const COMBO_PAIRS: [[(usize, usize); 2]; 12] = [
    [(0, 0), (0, 1)],
    [(0, 0), (1, 0)],
    [(0, 0), (1, 1)],
    [(0, 2), (0, 1)],
    [(0, 2), (1, 2)],
    [(0, 2), (1, 1)],
    [(2, 0), (1, 0)],
    [(2, 0), (2, 1)],
    [(2, 0), (1, 1)],
    [(2, 2), (1, 2)],
    [(2, 2), (2, 1)],
    [(2, 2), (1, 1)],
];

/// Macroboard lines scored for potential, as `[won, won, available]`.
///
/// Only this orientation of each line counts: a pair won at the far end or
/// split around the open zone scores nothing.
pub const MACRO_POTENTIAL_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Weights of the heuristic terms. A weight of zero disables its term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalWeights {
    pub cell_table: CellTable,
    /// Per zone won.
    pub zone_won: i32,
    /// Per zone currently `Available`, unsigned.
    pub available_zone: i32,
    /// Once, when the macroboard holds a completed line.
    pub macro_line: i32,
    /// Per zone line with two of a player's marks and one empty cell.
    pub local_threat: i32,
    /// Per corner pair with one mark and one empty cell.
    pub combo: i32,
    /// Per [`MACRO_POTENTIAL_LINES`] entry with its first two zones won by
    /// one player and the last `Available`.
    pub macro_potential: i32,
    /// When the centre zone is won.
    pub macro_center: i32,
}

impl EvalWeights {
    pub fn canonical() -> Self {
        Self {
            cell_table: CANONICAL_CELL_TABLE,
            zone_won: 15,
            available_zone: 10,
            macro_line: 20,
            local_threat: 10,
            combo: 3,
            macro_potential: 30,
            macro_center: 0,
        }
    }

    pub fn tactical() -> Self {
        Self {
            macro_center: 50,
            ..Self::canonical()
        }
    }

    pub fn positional() -> Self {
        Self {
            cell_table: POSITIONAL_CELL_TABLE,
            zone_won: 0,
            available_zone: 0,
            macro_line: 100,
            local_threat: 0,
            combo: 0,
            macro_potential: 30,
            macro_center: 50,
        }
    }
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self::canonical()
    }
}

/// The hand-tuned evaluator used by every profile.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: EvalWeights,
}

impl HeuristicEvaluator {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    fn cell_score(&self, state: &GameState) -> i32 {
        let mut score = 0;
        for (x, column) in state.board().iter().enumerate() {
            for (y, cell) in column.iter().enumerate() {
                if let Some(player) = cell {
                    score += player.sign() * self.weights.cell_table[x][y];
                }
            }
        }
        score
    }

    fn zone_score(&self, state: &GameState) -> i32 {
        state
            .macroboard()
            .iter()
            .flatten()
            .map(|zone| match zone {
                ZoneStatus::Won(player) => player.sign() * self.weights.zone_won,
                ZoneStatus::Available => self.weights.available_zone,
                _ => 0,
            })
            .sum()
    }

    fn local_threat_score(&self, state: &GameState) -> i32 {
        let mut score = 0;
        for zx in 0..ZONE_SIZE {
            for zy in 0..ZONE_SIZE {
                for line in &LINES {
                    let (marks_a, marks_b, empty) = count_line(state, zx, zy, line);
                    if empty == 1 && marks_a == 2 {
                        score += self.weights.local_threat;
                    } else if empty == 1 && marks_b == 2 {
                        score -= self.weights.local_threat;
                    }
                }
            }
        }
        score
    }

    fn combo_score(&self, state: &GameState) -> i32 {
        let mut score = 0;
        for zx in 0..ZONE_SIZE {
            for zy in 0..ZONE_SIZE {
                let at = |(lx, ly): (usize, usize)| {
                    state.cell(zx * ZONE_SIZE + lx, zy * ZONE_SIZE + ly)
                };
                for [first, second] in COMBO_PAIRS {
                    match (at(first), at(second)) {
                        (Some(player), None) | (None, Some(player)) => {
                            score += player.sign() * self.weights.combo;
                        }
                        _ => {}
                    }
                }
            }
        }
        score
    }

    fn macro_potential_score(&self, state: &GameState) -> i32 {
        let mut score = 0;
        for [first, second, target] in MACRO_POTENTIAL_LINES {
            if state.zone(target.0, target.1) != ZoneStatus::Available {
                continue;
            }
            if let Some(player) = state.zone(first.0, first.1).winner() {
                if state.zone(second.0, second.1) == ZoneStatus::Won(player) {
                    score += player.sign() * self.weights.macro_potential;
                }
            }
        }
        score
    }
}

impl Evaluator for HeuristicEvaluator {
    fn score(&self, state: &GameState) -> i32 {
        let w = &self.weights;
        let mut score = self.cell_score(state);

        if w.zone_won != 0 || w.available_zone != 0 {
            score += self.zone_score(state);
        }
        if w.macro_line != 0 {
            if let GameResult::Win(player) = state.outcome() {
                score += player.sign() * w.macro_line;
            }
        }
        if w.local_threat != 0 {
            score += self.local_threat_score(state);
        }
        if w.combo != 0 {
            score += self.combo_score(state);
        }
        if w.macro_potential != 0 {
            score += self.macro_potential_score(state);
        }
        if w.macro_center != 0 {
            if let Some(player) = state.zone(1, 1).winner() {
                score += player.sign() * w.macro_center;
            }
        }

        score
    }
}

/// Marks of A, marks of B and empty cells on one line of a zone.
fn count_line(
    state: &GameState,
    zx: usize,
    zy: usize,
    line: &[(usize, usize); 3],
) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for &(lx, ly) in line {
        match state.cell(zx * ZONE_SIZE + lx, zy * ZONE_SIZE + ly) {
            Some(Player::A) => counts.0 += 1,
            Some(Player::B) => counts.1 += 1,
            None => counts.2 += 1,
        }
    }
    counts
}
