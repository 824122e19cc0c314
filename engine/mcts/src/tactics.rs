//! One-ply tactics: opening replies, pre-search short-circuits and the
//! threat-aware adjustments used to order candidates during expansion.

use games_uttt::{GameResult, GameState, Move, Player};

use crate::config::{MctsConfig, MoveOrdering, OpeningPreference, ShortCircuits};
use crate::search::MoveSource;

/// Corners of the centre zone, in preference order.
const CENTER_ZONE_CORNERS: [(usize, usize); 4] = [(3, 3), (3, 5), (5, 3), (5, 5)];

/// Fixed reply for move 0, if the preference names a legal cell.
pub fn opening_move(
    state: &GameState,
    moves: &[Move],
    preference: OpeningPreference,
) -> Option<Move> {
    if state.move_number() != 0 {
        return None;
    }

    match preference {
        OpeningPreference::None => None,
        OpeningPreference::Center => Some(Move::new(4, 4)).filter(|mv| moves.contains(mv)),
        OpeningPreference::Corners => CENTER_ZONE_CORNERS
            .iter()
            .map(|&(x, y)| Move::new(x, y))
            .find(|mv| moves.contains(mv)),
    }
}

/// A move that wins a zone and, with it, the macroboard.
pub fn global_winning_move(state: &GameState, moves: &[Move]) -> Option<Move> {
    let player = state.current_player();
    moves.iter().copied().find(|&mv| {
        state.wins_zone(mv, player) && state.with_move(mv).outcome() == GameResult::Win(player)
    })
}

/// First move that would win its zone for `player`.
pub fn zone_winning_move(state: &GameState, moves: &[Move], player: Player) -> Option<Move> {
    moves.iter().copied().find(|&mv| state.wins_zone(mv, player))
}

/// First move that occupies a cell the opponent needs to win a zone.
pub fn blocking_move(state: &GameState, moves: &[Move]) -> Option<Move> {
    zone_winning_move(state, moves, state.current_player().opponent())
}

/// Run the enabled short-circuits in order: opening, global win, zone win,
/// block. Returns the move and which rule produced it.
pub fn pre_search_move(
    state: &GameState,
    moves: &[Move],
    config: &MctsConfig,
) -> Option<(Move, MoveSource)> {
    if let Some(mv) = opening_move(state, moves, config.opening) {
        return Some((mv, MoveSource::Opening));
    }

    let ShortCircuits {
        global_win,
        zone_win,
        block,
    } = config.short_circuits;

    if global_win {
        if let Some(mv) = global_winning_move(state, moves) {
            return Some((mv, MoveSource::GlobalWin));
        }
    }
    if zone_win {
        if let Some(mv) = zone_winning_move(state, moves, state.current_player()) {
            return Some((mv, MoveSource::ZoneWin));
        }
    }
    if block {
        if let Some(mv) = blocking_move(state, moves) {
            return Some((mv, MoveSource::Block));
        }
    }
    None
}

/// Replies available in `state` that win a zone for `player`.
pub fn immediate_threats(state: &GameState, player: Player) -> usize {
    state
        .available_moves()
        .into_iter()
        .filter(|&mv| state.wins_zone(mv, player))
        .count()
}

/// Threats for `player` found by playing out every reply, then every threat
/// reply, up to `depth` plies.
pub fn future_threats(state: &GameState, player: Player, depth: u32) -> usize {
    if depth == 0 {
        return 0;
    }

    let mut count = 0;
    for mv in state.available_moves() {
        let next = state.with_move(mv);
        for threat in next.available_moves() {
            if next.wins_zone(threat, player) {
                count += 1 + future_threats(&next.with_move(threat), player, depth - 1);
            }
        }
    }
    count
}

/// Score adjustment for a candidate move `mv` whose resulting position is
/// `next`. Zero when ordering is disabled.
pub fn ordering_adjustment(ordering: &MoveOrdering, mv: Move, next: &GameState) -> i32 {
    let mut adjustment = 0;

    if ordering.decided_zone_penalty != 0 {
        let (zx, zy) = mv.zone();
        if !next.zone(zx, zy).is_open() {
            adjustment -= ordering.decided_zone_penalty;
        }
    }

    // `next` has the opponent to move.
    let opponent = next.current_player();
    if ordering.immediate_threat_weight != 0 {
        adjustment -= ordering.immediate_threat_weight * immediate_threats(next, opponent) as i32;
    }
    if ordering.future_threat_weight != 0 && ordering.threat_lookahead > 0 {
        let threats = future_threats(next, opponent, ordering.threat_lookahead);
        adjustment -= ordering.future_threat_weight * threats as i32;
    }

    adjustment
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_uttt::ZoneStatus;

    #[test]
    fn test_opening_center() {
        let state = GameState::new();
        let moves = state.available_moves();
        assert_eq!(
            opening_move(&state, &moves, OpeningPreference::Center),
            Some(Move::new(4, 4))
        );
        assert_eq!(opening_move(&state, &moves, OpeningPreference::None), None);
    }

    #[test]
    fn test_opening_corners_skips_occupied() {
        let mut state = GameState::new();
        state.set_cell(3, 3, Some(Player::B));
        let moves = state.available_moves();
        assert_eq!(
            opening_move(&state, &moves, OpeningPreference::Corners),
            Some(Move::new(3, 5))
        );
    }

    #[test]
    fn test_opening_only_on_first_move() {
        let state = GameState::new().with_move(Move::new(0, 0));
        let moves = state.available_moves();
        assert_eq!(opening_move(&state, &moves, OpeningPreference::Center), None);
    }

    #[test]
    fn test_zone_win_and_block() {
        let mut state = GameState::new();
        state.set_cell(0, 0, Some(Player::A));
        state.set_cell(0, 1, Some(Player::A));
        state.set_cell(8, 8, Some(Player::B));
        state.set_cell(7, 7, Some(Player::B));
        let moves = state.available_moves();

        assert_eq!(
            zone_winning_move(&state, &moves, Player::A),
            Some(Move::new(0, 2))
        );
        assert_eq!(blocking_move(&state, &moves), Some(Move::new(6, 6)));
    }

    #[test]
    fn test_global_win_needs_macro_line() {
        let mut state = GameState::new();
        state.set_cell(0, 0, Some(Player::A));
        state.set_cell(0, 1, Some(Player::A));
        let moves = state.available_moves();
        assert_eq!(global_winning_move(&state, &moves), None);

        state.set_zone(1, 0, ZoneStatus::Won(Player::A));
        state.set_zone(2, 0, ZoneStatus::Won(Player::A));
        let moves = state.available_moves();
        assert_eq!(global_winning_move(&state, &moves), Some(Move::new(0, 2)));
    }

    #[test]
    fn test_pre_search_order() {
        let mut state = GameState::new();
        state.set_move_number(2);
        state.set_cell(0, 0, Some(Player::A));
        state.set_cell(0, 1, Some(Player::A));
        state.set_cell(4, 3, Some(Player::B));
        state.set_cell(4, 5, Some(Player::B));
        let moves = state.available_moves();
        let config = MctsConfig::default();

        // Zone win beats block.
        assert_eq!(
            pre_search_move(&state, &moves, &config),
            Some((Move::new(0, 2), MoveSource::ZoneWin))
        );

        let config = config.with_short_circuits(ShortCircuits {
            zone_win: false,
            ..ShortCircuits::all()
        });
        assert_eq!(
            pre_search_move(&state, &moves, &config),
            Some((Move::new(4, 4), MoveSource::Block))
        );

        let config = config.with_short_circuits(ShortCircuits::none());
        assert_eq!(pre_search_move(&state, &moves, &config), None);
    }

    #[test]
    fn test_pre_search_opening() {
        let state = GameState::new();
        let moves = state.available_moves();
        assert_eq!(
            pre_search_move(&state, &moves, &MctsConfig::default()),
            Some((Move::new(4, 4), MoveSource::Opening))
        );
    }

    #[test]
    fn test_immediate_threats() {
        let mut state = GameState::new();
        state.set_move_number(1);
        state.set_cell(4, 3, Some(Player::B));
        state.set_cell(4, 5, Some(Player::B));
        state.set_cell(3, 3, Some(Player::B));
        assert_eq!(immediate_threats(&state, Player::B), 2);
        assert_eq!(immediate_threats(&state, Player::A), 0);
    }

    #[test]
    fn test_future_threats_zero_depth() {
        let state = GameState::new();
        assert_eq!(future_threats(&state, Player::A, 0), 0);
    }

    /// Only zones (0, 0) and (1, 1) are open, B to move. Playing (3, 3) sends
    /// A into zone (0, 0), which has three empty cells left. Zone (1, 1) is
    /// then left with (5, 4) and (5, 5) empty.
    fn lookahead_position() -> GameState {
        let mut board = [[None; 9]; 9];
        let marks = [
            // zone (0, 0)
            (0, 0, Player::B),
            (0, 1, Player::B),
            (1, 0, Player::A),
            (1, 1, Player::A),
            (1, 2, Player::B),
            (2, 1, Player::B),
            // zone (1, 1)
            (4, 3, Player::A),
            (5, 3, Player::A),
            (3, 4, Player::A),
            (4, 4, Player::B),
            (3, 5, Player::A),
            (4, 5, Player::B),
        ];
        for (x, y, player) in marks {
            board[x][y] = Some(player);
        }

        let mut macroboard = [[ZoneStatus::Drawn; 3]; 3];
        macroboard[0][0] = ZoneStatus::Available;
        macroboard[1][1] = ZoneStatus::Available;

        GameState::from_parts(board, macroboard, 11, None)
    }

    #[test]
    fn test_future_threats_by_depth() {
        let state = lookahead_position().with_move(Move::new(3, 3));
        assert_eq!(state.forced_zone(), Some((0, 0)));
        assert_eq!(state.available_moves().len(), 3);

        // Depth 1: (0, 2) for B after A takes (2, 0) or (2, 2), and (5, 5)
        // for B after any of A's three replies.
        assert_eq!(future_threats(&state, Player::B, 1), 5);
        // Depth 2 finds one more B threat behind four of those five.
        assert_eq!(future_threats(&state, Player::B, 2), 9);

        // A only threatens the anti-diagonal of zone (0, 0) at depth 1, and
        // the last column of zone (1, 1) once play moves there.
        assert_eq!(future_threats(&state, Player::A, 1), 2);
        assert_eq!(future_threats(&state, Player::A, 2), 6);
    }

    #[test]
    fn test_ordering_counts_future_threats() {
        let ordering = MoveOrdering {
            decided_zone_penalty: 50,
            immediate_threat_weight: 10,
            future_threat_weight: 5,
            threat_lookahead: 2,
        };

        let mv = Move::new(3, 3);
        let next = lookahead_position().with_move(mv);

        // Zone (1, 1) stays open and A has no zone win on the spot.
        assert!(next.zone(1, 1).is_open());
        assert_eq!(immediate_threats(&next, Player::A), 0);
        assert_eq!(ordering_adjustment(&ordering, mv, &next), -5 * 6);

        let shallow = MoveOrdering {
            threat_lookahead: 1,
            ..ordering
        };
        assert_eq!(ordering_adjustment(&shallow, mv, &next), -5 * 2);
        assert_eq!(ordering_adjustment(&MoveOrdering::tactical(), mv, &next), -5 * 6);
    }

    #[test]
    fn test_ordering_penalises_closing_zone_and_threats() {
        let ordering = MoveOrdering {
            decided_zone_penalty: 50,
            immediate_threat_weight: 10,
            future_threat_weight: 0,
            threat_lookahead: 0,
        };

        // A completes zone (0, 0); the reply goes to zone (0, 2) where B has
        // two in a column.
        let mut state = GameState::new();
        state.set_cell(0, 0, Some(Player::A));
        state.set_cell(0, 1, Some(Player::A));
        state.set_cell(0, 6, Some(Player::B));
        state.set_cell(0, 7, Some(Player::B));
        let mv = Move::new(0, 2);
        let next = state.with_move(mv);

        assert_eq!(ordering_adjustment(&ordering, mv, &next), -50 - 10);
        assert_eq!(ordering_adjustment(&MoveOrdering::disabled(), mv, &next), 0);
    }
}
