//! Ultimate Tic-Tac-Toe rules engine
//!
//! This crate owns the game rules used by the search agents: the 9x9 board,
//! the 3x3 macroboard of zone statuses, legal move generation under the
//! forced-zone rule, and win detection at both board levels.
//!
//! # Board layout
//!
//! Cells are addressed as `(x, y)` with both coordinates in `0..9`. Zone
//! `(zx, zy)` covers cells `x in 3*zx..3*zx+3` and `y in 3*zy..3*zy+3`. The
//! player to move is derived from the move counter: even counts belong to
//! [`Player::A`] (mark `0`), odd counts to [`Player::B`] (mark `1`).
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::{GameResult, GameState, Move, Player};
//!
//! let mut state = GameState::new();
//! assert_eq!(state.available_moves().len(), 81);
//!
//! state.apply_move(Move::new(4, 4));
//! assert_eq!(state.current_player(), Player::B);
//!
//! // The reply is forced into the centre zone.
//! assert!(state.available_moves().iter().all(|mv| mv.zone() == (1, 1)));
//! assert_eq!(state.outcome(), GameResult::Active);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Side length of the full board.
pub const BOARD_SIZE: usize = 9;

/// Side length of a zone and of the macroboard.
pub const ZONE_SIZE: usize = 3;

/// The eight winning lines of a 3x3 grid, as local `(x, y)` coordinates.
///
/// Shared by zone win detection, the macroboard result and the evaluator.
pub const LINES: [[(usize, usize); 3]; 8] = [
    // columns (fixed x)
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // rows (fixed y)
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves on even move numbers, mark `0`, favoured by positive scores.
    A,
    /// Moves on odd move numbers, mark `1`.
    B,
}

impl Player {
    /// The player whose turn it is at the given move number.
    #[inline]
    pub fn from_move_number(move_number: u32) -> Self {
        if move_number % 2 == 0 {
            Player::A
        } else {
            Player::B
        }
    }

    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Board mark used when rendering: `0` for A, `1` for B.
    pub fn mark(self) -> char {
        match self {
            Player::A => '0',
            Player::B => '1',
        }
    }

    /// +1 for A, -1 for B. Scores are always from A's point of view.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Player::A => 1,
            Player::B => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "A"),
            Player::B => write!(f, "B"),
        }
    }
}

/// Contents of a single board cell.
pub type Cell = Option<Player>;

/// Status of one zone on the macroboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoneStatus {
    /// Still open but not currently unlocked for play.
    #[default]
    Empty,
    /// Open and unlocked.
    Available,
    /// Closed by a completed line.
    Won(Player),
    /// Closed because every cell is filled without a line.
    Drawn,
}

impl ZoneStatus {
    /// Whether moves may still be placed in this zone.
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, ZoneStatus::Empty | ZoneStatus::Available)
    }

    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            ZoneStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Global result read off the macroboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Active,
    Win(Player),
    Tie,
}

/// Errors produced when building a [`Move`] from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("coordinate ({x}, {y}) is outside the 9x9 board")]
    OutOfRange { x: usize, y: usize },

    #[error("cannot parse a move from '{0}', expected \"x y\" or \"x,y\"")]
    Parse(String),
}

/// A cell placement. Equality is by coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    x: u8,
    y: u8,
}

impl Move {
    /// Create a move, panicking on out-of-range coordinates.
    pub fn new(x: usize, y: usize) -> Self {
        assert!(
            x < BOARD_SIZE && y < BOARD_SIZE,
            "move ({x}, {y}) is outside the 9x9 board"
        );
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    /// Create a move, returning an error on out-of-range coordinates.
    pub fn try_new(x: usize, y: usize) -> Result<Self, MoveError> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Ok(Self::new(x, y))
        } else {
            Err(MoveError::OutOfRange { x, y })
        }
    }

    #[inline]
    pub fn x(self) -> usize {
        self.x as usize
    }

    #[inline]
    pub fn y(self) -> usize {
        self.y as usize
    }

    /// Macroboard coordinates of the zone containing this cell.
    #[inline]
    pub fn zone(self) -> (usize, usize) {
        (self.x() / ZONE_SIZE, self.y() / ZONE_SIZE)
    }

    /// Coordinates inside the zone. These also name the zone the reply is
    /// forced into.
    #[inline]
    pub fn local(self) -> (usize, usize) {
        (self.x() % ZONE_SIZE, self.y() % ZONE_SIZE)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [x, y] => {
                let x = x.parse().map_err(|_| MoveError::Parse(s.to_string()))?;
                let y = y.parse().map_err(|_| MoveError::Parse(s.to_string()))?;
                Move::try_new(x, y)
            }
            _ => Err(MoveError::Parse(s.to_string())),
        }
    }
}

/// Complete game position.
///
/// A plain value: copying it is a deep copy, so search code can branch off
/// hypothetical positions without touching the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    board: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    macroboard: [[ZoneStatus; ZONE_SIZE]; ZONE_SIZE],
    move_number: u32,
    last_move: Option<Move>,
}

impl GameState {
    /// Fresh game: empty board, every zone available, A to move.
    pub fn new() -> Self {
        Self {
            board: [[None; BOARD_SIZE]; BOARD_SIZE],
            macroboard: [[ZoneStatus::Available; ZONE_SIZE]; ZONE_SIZE],
            move_number: 0,
            last_move: None,
        }
    }

    /// Build a position directly from its parts.
    ///
    /// The caller is responsible for the board and macroboard agreeing.
    pub fn from_parts(
        board: [[Cell; BOARD_SIZE]; BOARD_SIZE],
        macroboard: [[ZoneStatus; ZONE_SIZE]; ZONE_SIZE],
        move_number: u32,
        last_move: Option<Move>,
    ) -> Self {
        Self {
            board,
            macroboard,
            move_number,
            last_move,
        }
    }

    #[inline]
    pub fn board(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.board
    }

    #[inline]
    pub fn macroboard(&self) -> &[[ZoneStatus; ZONE_SIZE]; ZONE_SIZE] {
        &self.macroboard
    }

    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.board[x][y]
    }

    #[inline]
    pub fn zone(&self, zx: usize, zy: usize) -> ZoneStatus {
        self.macroboard[zx][zy]
    }

    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// The player who places the next mark.
    #[inline]
    pub fn current_player(&self) -> Player {
        Player::from_move_number(self.move_number)
    }

    // Setup mutators for harnesses that load positions cell by cell.

    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.board[x][y] = cell;
    }

    pub fn set_zone(&mut self, zx: usize, zy: usize, status: ZoneStatus) {
        self.macroboard[zx][zy] = status;
    }

    pub fn set_move_number(&mut self, move_number: u32) {
        self.move_number = move_number;
    }

    pub fn set_last_move(&mut self, last_move: Option<Move>) {
        self.last_move = last_move;
    }

    /// The zone the next move is confined to, if the forcing rule applies.
    ///
    /// The rule applies when the previous move's local coordinates name a
    /// zone that is `Available` and still has an empty cell.
    pub fn forced_zone(&self) -> Option<(usize, usize)> {
        let (zx, zy) = self.last_move?.local();
        if self.macroboard[zx][zy] == ZoneStatus::Available && !self.zone_is_full(zx, zy) {
            Some((zx, zy))
        } else {
            None
        }
    }

    /// Legal moves in x-major order. Empty once the game is decided.
    pub fn available_moves(&self) -> Vec<Move> {
        if self.outcome() != GameResult::Active {
            return Vec::new();
        }

        if let Some((zx, zy)) = self.forced_zone() {
            return self.empty_cells_in_zone(zx, zy).collect();
        }

        let mut moves = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for x in 0..BOARD_SIZE {
            for y in 0..BOARD_SIZE {
                if self.board[x][y].is_none()
                    && self.macroboard[x / ZONE_SIZE][y / ZONE_SIZE].is_open()
                {
                    moves.push(Move::new(x, y));
                }
            }
        }
        moves
    }

    /// Place the current player's mark and advance the position.
    ///
    /// Updates the zone the move landed in (won or drawn), unlocks the zone
    /// the reply is sent to and records the move.
    ///
    /// # Panics
    ///
    /// If the cell is occupied or the game is already decided.
    pub fn apply_move(&mut self, mv: Move) {
        assert!(
            self.board[mv.x()][mv.y()].is_none(),
            "cell {mv} is already occupied"
        );
        assert!(
            self.outcome() == GameResult::Active,
            "cannot play {mv} on a finished game"
        );

        let player = self.current_player();
        self.board[mv.x()][mv.y()] = Some(player);
        self.move_number += 1;

        let (zx, zy) = mv.zone();
        if self.macroboard[zx][zy].is_open() {
            if self.completes_line(mv, player) {
                self.macroboard[zx][zy] = ZoneStatus::Won(player);
            } else if self.zone_is_full(zx, zy) {
                self.macroboard[zx][zy] = ZoneStatus::Drawn;
            }
        }

        let (fx, fy) = mv.local();
        if self.macroboard[fx][fy] == ZoneStatus::Empty {
            self.macroboard[fx][fy] = ZoneStatus::Available;
        } else {
            for zone in self.macroboard.iter_mut().flatten() {
                if *zone == ZoneStatus::Empty {
                    *zone = ZoneStatus::Available;
                }
            }
        }

        self.last_move = Some(mv);
    }

    /// Copy of this position with `mv` applied.
    #[inline]
    pub fn with_move(&self, mv: Move) -> Self {
        let mut next = *self;
        next.apply_move(mv);
        next
    }

    /// Result read off the macroboard.
    pub fn outcome(&self) -> GameResult {
        for line in &LINES {
            let [a, b, c] = *line;
            if let ZoneStatus::Won(player) = self.macroboard[a.0][a.1] {
                if self.macroboard[b.0][b.1] == ZoneStatus::Won(player)
                    && self.macroboard[c.0][c.1] == ZoneStatus::Won(player)
                {
                    return GameResult::Win(player);
                }
            }
        }

        if self.macroboard.iter().flatten().any(|zone| zone.is_open()) {
            GameResult::Active
        } else {
            GameResult::Tie
        }
    }

    /// No legal moves remain or the macroboard is decided.
    pub fn is_terminal(&self) -> bool {
        self.outcome() != GameResult::Active || self.available_moves().is_empty()
    }

    /// Whether the mark already at `mv` completes a line in its zone.
    pub fn is_local_win(&self, mv: Move) -> bool {
        match self.board[mv.x()][mv.y()] {
            Some(player) => self.completes_line(mv, player),
            None => false,
        }
    }

    /// Whether placing `player`'s mark at the empty cell `mv` would win its
    /// zone. The position is not modified.
    pub fn wins_zone(&self, mv: Move, player: Player) -> bool {
        let (zx, zy) = mv.zone();
        self.board[mv.x()][mv.y()].is_none()
            && self.macroboard[zx][zy].is_open()
            && self.completes_line(mv, player)
    }

    /// Uniformly random legal move, or `None` when there are none.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.available_moves().choose(rng).copied()
    }

    /// Empty cells of one zone, x-major.
    pub fn empty_cells_in_zone(&self, zx: usize, zy: usize) -> impl Iterator<Item = Move> + '_ {
        zone_cells(zx, zy).filter(move |mv| self.board[mv.x()][mv.y()].is_none())
    }

    pub fn zone_is_full(&self, zx: usize, zy: usize) -> bool {
        self.empty_cells_in_zone(zx, zy).next().is_none()
    }

    /// Checks the lines through `mv` inside its zone, treating `mv` itself
    /// as holding `player`'s mark.
    fn completes_line(&self, mv: Move, player: Player) -> bool {
        let (zx, zy) = mv.zone();
        let (lx, ly) = mv.local();
        let owns = |cx: usize, cy: usize| {
            (cx == lx && cy == ly)
                || self.board[zx * ZONE_SIZE + cx][zy * ZONE_SIZE + cy] == Some(player)
        };

        LINES
            .iter()
            .filter(|line| line.contains(&(lx, ly)))
            .any(|line| line.iter().all(|&(cx, cy)| owns(cx, cy)))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            if y > 0 && y % ZONE_SIZE == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for x in 0..BOARD_SIZE {
                if x > 0 && x % ZONE_SIZE == 0 {
                    write!(f, "| ")?;
                }
                let mark = self.board[x][y].map_or('.', Player::mark);
                write!(f, "{mark}")?;
                if x + 1 < BOARD_SIZE {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// All nine cells of zone `(zx, zy)`, x-major.
pub fn zone_cells(zx: usize, zy: usize) -> impl Iterator<Item = Move> {
    let x0 = zx * ZONE_SIZE;
    let y0 = zy * ZONE_SIZE;
    (x0..x0 + ZONE_SIZE).flat_map(move |x| (y0..y0 + ZONE_SIZE).map(move |y| Move::new(x, y)))
}
