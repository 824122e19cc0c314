//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the struct defaults, the serde fallbacks and the CLI defaults all agree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    actor: ActorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    profile: String,
    time_budget_ms: u64,
    expansion_cap: usize,
    max_iterations: u32,
}

#[derive(Debug, Deserialize)]
struct ActorDefaults {
    games: u32,
    player_a: String,
    player_b: String,
    log_interval: u32,
    stats_path: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
/// 0 means "seed from entropy".
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Search
pub fn profile() -> &'static str {
    &DEFAULTS.search.profile
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn expansion_cap() -> usize {
    DEFAULTS.search.expansion_cap
}
/// 0 means no iteration cap.
pub fn max_iterations() -> u32 {
    DEFAULTS.search.max_iterations
}

// Actor
pub fn games() -> u32 {
    DEFAULTS.actor.games
}
pub fn player_a() -> &'static str {
    &DEFAULTS.actor.player_a
}
pub fn player_b() -> &'static str {
    &DEFAULTS.actor.player_b
}
pub fn log_interval() -> u32 {
    DEFAULTS.actor.log_interval
}
/// Empty means no stats snapshot is written.
pub fn stats_path() -> &'static str {
    &DEFAULTS.actor.stats_path
}
