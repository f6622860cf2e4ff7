//! Arena - Tournament runner for the search engine
//!
//! Plays a series of games between two competitors and reports how often
//! each one won:
//! 1. Builds the game environment (tic-tac-toe or connect four)
//! 2. Creates competitor A (player 1) and competitor B (player 2)
//! 3. Plays the configured number of rounds, printing each result
//! 4. Prints the average score of both competitors

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::{Environment, ParseAction, Player, TwoPlayerState};
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fmt::Display;
use tracing::info;

mod agent;
mod central_config;
mod config;
mod tournament;

use crate::agent::build_agent;
use crate::config::{Config, GameKind};
use crate::tournament::Tournament;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
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

    let seed = config.effective_seed();
    info!(
        game = ?config.game,
        player_a = ?config.player_a,
        player_b = ?config.player_b,
        rounds = config.rounds,
        timeout_ms = config.timeout_ms,
        tree_policy = ?config.tree_policy,
        seed = ?seed,
        "Starting tournament"
    );

    match config.game {
        GameKind::Tictactoe => run_tournament(TicTacToe::new(), &config, seed),
        GameKind::Connect4 => {
            let env = Connect4::new(config.width, config.height)
                .context("failed to create connect four board")?;
            run_tournament(env, &config, seed)
        }
    }
}

fn run_tournament<E>(env: E, config: &Config, seed: Option<u64>) -> Result<()>
where
    E: Environment,
    E::State: TwoPlayerState + ParseAction + Display + 'static,
{
    // Agents get their own streams so the environment's draws stay independent
    let agent_a = build_agent(
        config.player_a,
        Player::One,
        config,
        seed.map(|s| s.wrapping_add(1)),
    );
    let agent_b = build_agent(
        config.player_b,
        Player::Two,
        config,
        seed.map(|s| s.wrapping_add(2)),
    );
    let rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };

    let mut tournament = Tournament::new(env, agent_a, agent_b, rng);
    let result = tournament.run(config.rounds, |i, round| {
        let (a, b) = round.scores();
        println!("{}: {}, {}", i, a, b);
    })?;

    println!(
        "Tournament results: {:.3} / {:.3}",
        result.score_a(),
        result.score_b()
    );
    Ok(())
}
