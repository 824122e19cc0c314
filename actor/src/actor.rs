//! Match runner: two agents play a series of games, alternating colours.

use anyhow::{anyhow, Context, Result};
use games_uttt::{GameResult, GameState, Player};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{Agent, MctsAgent, RandomAgent};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{Config, PlayerKind};
use crate::stats::{GameRecord, MatchStats, MatchStatsSnapshot, Seat};

/// Build the agent for one seat.
fn build_agent(config: &Config, name: &str, seat_index: u64) -> Result<Box<dyn Agent>> {
    let seed = config.seat_seed(seat_index);
    let agent: Box<dyn Agent> = match config.player_kind(name)? {
        PlayerKind::Random => Box::new(match seed {
            Some(seed) => RandomAgent::with_seed(seed),
            None => RandomAgent::new(),
        }),
        PlayerKind::Mcts(profile) => {
            let search = config.search_config(profile);
            Box::new(match seed {
                Some(seed) => MctsAgent::with_seed(profile.as_str(), search, seed),
                None => MctsAgent::new(profile.as_str(), search),
            })
        }
    };
    Ok(agent)
}

pub struct Actor {
    config: Config,
    agents: [Box<dyn Agent>; 2],
    stats: MatchStats,
}

impl Actor {
    pub fn new(config: Config) -> Result<Self> {
        let agent_a = build_agent(&config, &config.player_a, 0)
            .with_context(|| format!("building player A '{}'", config.player_a))?;
        let agent_b = build_agent(&config, &config.player_b, 1)
            .with_context(|| format!("building player B '{}'", config.player_b))?;
        let stats = MatchStats::new(agent_a.name(), agent_b.name(), config.stats_path());

        Ok(Self {
            config,
            agents: [agent_a, agent_b],
            stats,
        })
    }

    /// Seat that moves first in game `game_index` (0-based).
    pub fn first_seat(game_index: u32) -> Seat {
        if game_index % 2 == 0 {
            Seat::A
        } else {
            Seat::B
        }
    }

    /// Play every configured game and return the final statistics.
    pub fn run(&mut self) -> Result<MatchStatsSnapshot> {
        info!(
            games = self.config.games,
            player_a = self.agents[0].name(),
            player_b = self.agents[1].name(),
            time_budget_ms = self.config.time_budget_ms,
            "Actor starting match"
        );

        // Progress bar only when stderr is a TTY
        let progress = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            let pb = ProgressBar::new(self.config.games as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for game_index in 0..self.config.games {
            let record = self
                .play_game(game_index)
                .with_context(|| format!("game {} failed", game_index + 1))?;
            self.stats.record_game(&record);
            self.stats.write_stats();

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            let played = self.stats.games_played();
            if self.config.log_interval > 0 && played % self.config.log_interval == 0 {
                let winner = match record.winner {
                    Some(seat) => self.agents[seat_index(seat)].name().to_string(),
                    None => "tie".to_string(),
                };
                let snapshot = self.stats.snapshot();
                let log = || {
                    info!(
                        game = played,
                        first = self.agents[seat_index(record.first)].name(),
                        winner = %winner,
                        moves = record.moves,
                        a_wins = snapshot.player_a_wins,
                        b_wins = snapshot.player_b_wins,
                        ties = snapshot.ties,
                        "Game finished"
                    )
                };
                // Suspend progress bar while logging to avoid visual glitches
                match progress {
                    Some(ref pb) => pb.suspend(log),
                    None => log(),
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let snapshot = self.stats.snapshot();
        info!(
            games = snapshot.games_played,
            player_a = %snapshot.player_a,
            player_a_wins = snapshot.player_a_wins,
            player_b = %snapshot.player_b,
            player_b_wins = snapshot.player_b_wins,
            ties = snapshot.ties,
            first_mover_wins = snapshot.first_mover_wins,
            a_avg_move_ms = format!("{:.1}", snapshot.player_a_avg_move_ms),
            b_avg_move_ms = format!("{:.1}", snapshot.player_b_avg_move_ms),
            "Match complete"
        );
        Ok(snapshot)
    }

    /// Play one game to completion.
    pub fn play_game(&mut self, game_index: u32) -> Result<GameRecord> {
        let first = Self::first_seat(game_index);
        let seat_of = |player: Player| match player {
            Player::A => first,
            Player::B => first.other(),
        };

        let mut state = GameState::new();
        let mut think_time = [Duration::ZERO; 2];

        while !state.is_terminal() {
            let seat = seat_of(state.current_player());
            let agent = &mut self.agents[seat_index(seat)];

            let started = Instant::now();
            let mv = agent
                .choose_move(&state)
                .with_context(|| format!("{} failed to move", agent.name()))?;
            think_time[seat_index(seat)] += started.elapsed();

            if !state.available_moves().contains(&mv) {
                return Err(anyhow!(
                    "{} chose illegal move {} at move {}",
                    agent.name(),
                    mv,
                    state.move_number()
                ));
            }
            debug!(
                game = game_index + 1,
                move_number = state.move_number(),
                player = agent.name(),
                mv = %mv,
                "Move played"
            );
            state.apply_move(mv);
        }

        let winner = match state.outcome() {
            GameResult::Win(player) => Some(seat_of(player)),
            GameResult::Tie | GameResult::Active => None,
        };

        Ok(GameRecord {
            first,
            winner,
            moves: state.move_number(),
            think_time,
        })
    }
}

fn seat_index(seat: Seat) -> usize {
    match seat {
        Seat::A => 0,
        Seat::B => 1,
    }
}
