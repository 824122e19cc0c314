//! Actor - self-play match runner for the Ultimate Tic-Tac-Toe agents
//!
//! A short-lived process that:
//! 1. Loads configuration (config.toml, `UTTT_*` env vars, CLI flags)
//! 2. Builds the two agents named on the command line
//! 3. Plays the requested number of games, alternating who moves first
//! 4. Logs results and optionally writes a JSON stats snapshot

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

mod actor;
mod config;
mod stats;

use crate::actor::Actor;
use crate::config::Config;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let mut actor = Actor::new(config)?;

    match actor.run() {
        Ok(snapshot) => {
            println!(
                "{} {} - {} {} ({} ties) over {} games",
                snapshot.player_a,
                snapshot.player_a_wins,
                snapshot.player_b_wins,
                snapshot.player_b,
                snapshot.ties,
                snapshot.games_played
            );
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {:#}", e);
            Err(e)
        }
    }
}
