//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_profile() -> String {
    defaults::profile().into()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_expansion_cap() -> usize {
    defaults::expansion_cap()
}
fn d_max_iterations() -> u32 {
    defaults::max_iterations()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_player_a() -> String {
    defaults::player_a().into()
}
fn d_player_b() -> String {
    defaults::player_b().into()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}
fn d_stats_path() -> String {
    defaults::stats_path().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Base RNG seed; 0 seeds from entropy
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// Search configuration applied to every MCTS player
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Profile used when a player is named "mcts"
    #[serde(default = "d_profile")]
    pub profile: String,
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    #[serde(default = "d_expansion_cap")]
    pub expansion_cap: usize,
    /// 0 = bounded by time only
    #[serde(default = "d_max_iterations")]
    pub max_iterations: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            profile: defaults::profile().into(),
            time_budget_ms: defaults::time_budget_ms(),
            expansion_cap: defaults::expansion_cap(),
            max_iterations: defaults::max_iterations(),
        }
    }
}

/// Actor (self-play runner) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActorConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_player_a")]
    pub player_a: String,
    #[serde(default = "d_player_b")]
    pub player_b: String,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
    /// JSON stats snapshot path; empty disables it
    #[serde(default = "d_stats_path")]
    pub stats_path: String,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            player_a: defaults::player_a().into(),
            player_b: defaults::player_b().into(),
            log_interval: defaults::log_interval(),
            stats_path: defaults::stats_path().into(),
        }
    }
}
