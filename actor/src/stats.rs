//! Match statistics tracking and persistence.
//!
//! Tracks, per seat:
//! - Wins, ties and first-mover results
//! - Game lengths
//! - Time spent choosing moves
//!
//! Snapshots can be written to a JSON file after every game.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One of the two agents in a match, independent of the colour it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Seat that moved first
    pub first: Seat,
    /// Winning seat, None for a tie
    pub winner: Option<Seat>,
    /// Moves played
    pub moves: u32,
    /// Time spent inside `choose_move`, per seat
    pub think_time: [Duration; 2],
}

/// Aggregated match statistics.
#[derive(Debug)]
pub struct MatchStats {
    player_a: String,
    player_b: String,
    games_played: u32,
    wins: [u32; 2],
    ties: u32,
    first_mover_wins: u32,
    total_moves: u64,
    /// Total think time per seat (microseconds)
    think_us: [u64; 2],
    /// Moves made per seat
    seat_moves: [u64; 2],
    start_time: Instant,
    stats_path: Option<PathBuf>,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub player_a: String,
    pub player_b: String,
    pub games_played: u32,
    pub player_a_wins: u32,
    pub player_b_wins: u32,
    pub ties: u32,
    pub first_mover_wins: u32,
    pub avg_game_length: f64,
    pub player_a_avg_move_ms: f64,
    pub player_b_avg_move_ms: f64,
    pub games_per_second: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

fn index(seat: Seat) -> usize {
    match seat {
        Seat::A => 0,
        Seat::B => 1,
    }
}

fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}

impl MatchStats {
    /// Create new stats tracker.
    pub fn new(player_a: &str, player_b: &str, stats_path: Option<PathBuf>) -> Self {
        // Ensure the snapshot directory exists
        if let Some(parent) = stats_path.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("Failed to create stats directory: {}", e);
                }
            }
        }

        Self {
            player_a: player_a.to_string(),
            player_b: player_b.to_string(),
            games_played: 0,
            wins: [0; 2],
            ties: 0,
            first_mover_wins: 0,
            total_moves: 0,
            think_us: [0; 2],
            seat_moves: [0; 2],
            start_time: Instant::now(),
            stats_path,
        }
    }

    /// Record a completed game.
    pub fn record_game(&mut self, record: &GameRecord) {
        self.games_played += 1;
        self.total_moves += record.moves as u64;

        match record.winner {
            Some(seat) => {
                self.wins[index(seat)] += 1;
                if seat == record.first {
                    self.first_mover_wins += 1;
                }
            }
            None => self.ties += 1,
        }

        // The first mover makes the odd move out.
        let first_moves = (record.moves as u64).div_ceil(2);
        let second_moves = record.moves as u64 / 2;
        self.seat_moves[index(record.first)] += first_moves;
        self.seat_moves[index(record.first.other())] += second_moves;

        for seat in [Seat::A, Seat::B] {
            self.think_us[index(seat)] += record.think_time[index(seat)].as_micros() as u64;
        }
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let runtime = self.start_time.elapsed().as_secs_f64();
        let avg_move_ms = |seat: Seat| {
            ratio(self.think_us[index(seat)] as f64 / 1000.0, self.seat_moves[index(seat)])
        };

        MatchStatsSnapshot {
            player_a: self.player_a.clone(),
            player_b: self.player_b.clone(),
            games_played: self.games_played,
            player_a_wins: self.wins[0],
            player_b_wins: self.wins[1],
            ties: self.ties,
            first_mover_wins: self.first_mover_wins,
            avg_game_length: ratio(self.total_moves as f64, self.games_played as u64),
            player_a_avg_move_ms: avg_move_ms(Seat::A),
            player_b_avg_move_ms: avg_move_ms(Seat::B),
            games_per_second: if runtime > 0.0 {
                self.games_played as f64 / runtime
            } else {
                0.0
            },
            runtime_seconds: runtime,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Write stats to JSON file (atomic write-then-rename). No-op without a path.
    pub fn write_stats(&self) {
        let Some(stats_path) = &self.stats_path else {
            return;
        };
        let snapshot = self.snapshot();

        // Serialize to JSON
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize match stats: {}", e);
                return;
            }
        };

        // Write to temp file then rename (atomic on most filesystems)
        let temp_path = stats_path.with_extension("json.tmp");
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write match stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, stats_path) {
            warn!("Failed to rename stats file: {}", e);
            // Try to clean up temp file
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote match stats to {}", stats_path.display());
    }

    pub fn stats_path(&self) -> Option<&Path> {
        self.stats_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(first: Seat, winner: Option<Seat>, moves: u32) -> GameRecord {
        GameRecord {
            first,
            winner,
            moves,
            think_time: [Duration::from_millis(10), Duration::from_millis(20)],
        }
    }

    #[test]
    fn test_record_game() {
        let mut stats = MatchStats::new("canonical", "random", None);

        stats.record_game(&record(Seat::A, Some(Seat::A), 41));
        stats.record_game(&record(Seat::B, Some(Seat::A), 50));
        stats.record_game(&record(Seat::A, None, 60));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.games_played, 3);
        assert_eq!(snapshot.player_a_wins, 2);
        assert_eq!(snapshot.player_b_wins, 0);
        assert_eq!(snapshot.ties, 1);
        assert_eq!(snapshot.first_mover_wins, 1);
        assert!((snapshot.avg_game_length - 50.33).abs() < 0.01);
    }

    #[test]
    fn test_average_move_time_per_seat() {
        let mut stats = MatchStats::new("a", "b", None);

        // A moves first: 3 moves for A, 2 for B.
        stats.record_game(&record(Seat::A, Some(Seat::A), 5));

        let snapshot = stats.snapshot();
        assert!((snapshot.player_a_avg_move_ms - 10.0 / 3.0).abs() < 1e-6);
        assert!((snapshot.player_b_avg_move_ms - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_write_stats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");
        let mut stats = MatchStats::new("tactical", "positional", Some(path.clone()));

        stats.record_game(&record(Seat::B, Some(Seat::B), 33));
        stats.write_stats();

        // Verify file exists and is valid JSON
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let content = fs::read_to_string(&path).unwrap();
        let parsed: MatchStatsSnapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.games_played, 1);
        assert_eq!(parsed.player_b_wins, 1);
        assert_eq!(parsed.player_a, "tactical");
    }

    #[test]
    fn test_write_stats_without_path_is_noop() {
        let stats = MatchStats::new("a", "b", None);
        stats.write_stats();
        assert!(stats.stats_path().is_none());
    }

    // ========================================
    // Edge case tests
    // ========================================

    #[test]
    fn test_averages_with_zero_games() {
        let stats = MatchStats::new("a", "b", None);

        let snapshot = stats.snapshot();

        // Averages should be 0.0, not NaN or panic
        assert_eq!(snapshot.games_played, 0);
        assert_eq!(snapshot.avg_game_length, 0.0);
        assert_eq!(snapshot.player_a_avg_move_ms, 0.0);
        assert!(!snapshot.player_b_avg_move_ms.is_nan());
    }

    #[test]
    fn test_seat_other() {
        assert_eq!(Seat::A.other(), Seat::B);
        assert_eq!(Seat::B.other(), Seat::A);
    }
}
