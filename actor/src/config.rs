//! Configuration for the self-play runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use mcts::{MctsConfig, Profile};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_games() -> u32 {
    CENTRAL_CONFIG.actor.games
}

fn default_player_a() -> String {
    CENTRAL_CONFIG.actor.player_a.clone()
}

fn default_player_b() -> String {
    CENTRAL_CONFIG.actor.player_b.clone()
}

fn default_profile() -> String {
    CENTRAL_CONFIG.search.profile.clone()
}

fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.search.time_budget_ms
}

fn default_expansion_cap() -> usize {
    CENTRAL_CONFIG.search.expansion_cap
}

fn default_max_iterations() -> u32 {
    CENTRAL_CONFIG.search.max_iterations
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.actor.log_interval
}

fn default_stats_path() -> String {
    CENTRAL_CONFIG.actor.stats_path.clone()
}

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Random,
    Mcts(Profile),
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "actor")]
#[command(about = "Ultimate Tic-Tac-Toe self-play runner")]
#[command(
    long_about = "Plays a match between two agents, alternating who moves first,
and reports wins, ties and search timing.

Players are a profile name (canonical, tactical, positional), \"mcts\" for the
configured default profile, or \"random\".

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Number of games to play
    #[arg(long, default_value_t = default_games())]
    pub games: u32,

    /// Player in seat A (moves first in even-numbered games)
    #[arg(long, default_value_t = default_player_a())]
    pub player_a: String,

    /// Player in seat B
    #[arg(long, default_value_t = default_player_b())]
    pub player_b: String,

    /// Profile used for players named "mcts"
    #[arg(long, default_value_t = default_profile())]
    pub profile: String,

    /// Wall-clock search budget per move in milliseconds
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Children kept per expanded node
    #[arg(long, default_value_t = default_expansion_cap())]
    pub expansion_cap: usize,

    /// Iteration cap per move (0 for time-bounded only)
    #[arg(long, default_value_t = default_max_iterations())]
    pub max_iterations: u32,

    /// Base RNG seed (0 to seed from entropy)
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Log progress every N games (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Write a JSON stats snapshot here after every game (empty to disable)
    #[arg(long, default_value_t = default_stats_path())]
    pub stats_path: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            return Err(anyhow!("games must be greater than 0"));
        }

        self.player_kind(&self.player_a)?;
        self.player_kind(&self.player_b)?;

        if self.time_budget_ms == 0 && self.max_iterations == 0 {
            return Err(anyhow!(
                "time_budget_ms must be greater than 0 unless max_iterations is set"
            ));
        }

        if self.expansion_cap == 0 {
            return Err(anyhow!("expansion_cap must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Resolve a player name from the command line.
    pub fn player_kind(&self, name: &str) -> Result<PlayerKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(PlayerKind::Random),
            "mcts" => Ok(PlayerKind::Mcts(self.profile.parse()?)),
            other => other
                .parse()
                .map(PlayerKind::Mcts)
                .map_err(|_| anyhow!("unknown player '{}'", name)),
        }
    }

    /// Search settings for `profile` with this run's budget applied.
    pub fn search_config(&self, profile: Profile) -> MctsConfig {
        let max_iterations = (self.max_iterations > 0).then_some(self.max_iterations);
        MctsConfig::for_profile(profile)
            .with_time_budget(self.time_budget())
            .with_expansion_cap(self.expansion_cap)
            .with_max_iterations(max_iterations)
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Seed for a seat's agent, or None to seed from entropy.
    pub fn seat_seed(&self, seat_index: u64) -> Option<u64> {
        (self.seed != 0).then(|| self.seed.wrapping_add(seat_index))
    }

    pub fn stats_path(&self) -> Option<PathBuf> {
        (!self.stats_path.is_empty()).then(|| PathBuf::from(&self.stats_path))
    }
}
