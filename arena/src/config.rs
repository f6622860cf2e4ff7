//! Configuration for the arena
//!
//! Configuration is loaded from arena.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then arena.toml.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use games_connect4::{MAX_SIZE, MIN_SIZE};
use mcts::{MctsConfig, TreePolicyKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::central_config::{load_config, CentralConfig};

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

/// Game played in every round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[value(name = "tictactoe")]
    Tictactoe,
    #[default]
    #[value(name = "connect4")]
    Connect4,
}

/// Competitor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Moves typed on the console
    Human,
    /// Uniformly random legal moves
    Random,
    /// Time-bounded MCTS
    Mcts,
}

/// Tree policy used by MCTS agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    #[value(name = "uniform")]
    Uniform,
    #[value(name = "ucb1")]
    Ucb1,
}

impl From<PolicyKind> for TreePolicyKind {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Uniform => TreePolicyKind::Uniform,
            PolicyKind::Ucb1 => TreePolicyKind::Ucb1,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_value<T: ValueEnum>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|v| T::from_str(&v, true).ok())
}

// Default value functions that read from env, then central config
fn default_player_a() -> AgentKind {
    env_value("ARENA_PLAYER_A").unwrap_or(CENTRAL_CONFIG.tournament.player_a)
}

fn default_player_b() -> AgentKind {
    env_value("ARENA_PLAYER_B").unwrap_or(CENTRAL_CONFIG.tournament.player_b)
}

fn default_rounds() -> u32 {
    env_parse("ARENA_ROUNDS").unwrap_or(CENTRAL_CONFIG.tournament.rounds)
}

fn default_game() -> GameKind {
    env_value("ARENA_GAME").unwrap_or(CENTRAL_CONFIG.tournament.game)
}

fn default_width() -> usize {
    env_parse("ARENA_WIDTH").unwrap_or(CENTRAL_CONFIG.connect4.width)
}

fn default_height() -> usize {
    env_parse("ARENA_HEIGHT").unwrap_or(CENTRAL_CONFIG.connect4.height)
}

fn default_timeout_ms() -> u64 {
    env_parse("ARENA_TIMEOUT_MS").unwrap_or(CENTRAL_CONFIG.mcts.timeout_ms)
}

fn default_tree_policy() -> PolicyKind {
    env_value("ARENA_TREE_POLICY").unwrap_or(CENTRAL_CONFIG.mcts.tree_policy)
}

fn default_exploration() -> f64 {
    env_parse("ARENA_EXPLORATION").unwrap_or(CENTRAL_CONFIG.mcts.exploration)
}

fn default_max_entries() -> usize {
    env_parse("ARENA_MAX_ENTRIES").unwrap_or(CENTRAL_CONFIG.mcts.max_entries)
}

fn default_seed() -> Option<u64> {
    env_parse("ARENA_SEED").or(CENTRAL_CONFIG.common.seed)
}

fn default_log_level() -> String {
    std::env::var("ARENA_LOG_LEVEL").unwrap_or_else(|_| CENTRAL_CONFIG.common.log_level.clone())
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "arena")]
#[command(about = "Run a tournament between two game-playing agents")]
#[command(
    long_about = "Plays a series of rounds between competitor A (player 1) and
competitor B (player 2) and reports the average score of each.

Configuration is loaded from arena.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Competitor A, plays as player 1
    #[arg(value_enum, default_value_t = default_player_a())]
    pub player_a: AgentKind,

    /// Competitor B, plays as player 2
    #[arg(value_enum, default_value_t = default_player_b())]
    pub player_b: AgentKind,

    /// Number of rounds to play
    #[arg(long, default_value_t = default_rounds())]
    pub rounds: u32,

    /// Game to play
    #[arg(long, value_enum, default_value_t = default_game())]
    pub game: GameKind,

    /// Connect Four board width
    #[arg(long, default_value_t = default_width())]
    pub width: usize,

    /// Connect Four board height
    #[arg(long, default_value_t = default_height())]
    pub height: usize,

    /// MCTS thinking time per move in milliseconds
    #[arg(long, default_value_t = default_timeout_ms())]
    pub timeout_ms: u64,

    /// MCTS tree policy
    #[arg(long, value_enum, default_value_t = default_tree_policy())]
    pub tree_policy: PolicyKind,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Maximum states stored per MCTS agent (0 for unbounded)
    #[arg(long, default_value_t = default_max_entries())]
    pub max_entries: usize,

    /// Master seed for reproducible tournaments (falls back to ARENA_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(anyhow!("rounds must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.game == GameKind::Connect4 {
            for (name, value) in [("width", self.width), ("height", self.height)] {
                if !(MIN_SIZE..=MAX_SIZE).contains(&value) {
                    return Err(anyhow!(
                        "{} must be between {} and {}, got {}",
                        name,
                        MIN_SIZE,
                        MAX_SIZE,
                        value
                    ));
                }
            }
        }

        // Only UCB1 reads the exploration constant
        if self.tree_policy == PolicyKind::Ucb1
            && (!self.exploration.is_finite() || self.exploration < 0.0)
        {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        Ok(())
    }

    /// Seed from the CLI, else from ARENA_SEED or arena.toml
    pub fn effective_seed(&self) -> Option<u64> {
        self.seed.or_else(default_seed)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Engine configuration for an MCTS agent seeded with `seed`
    pub fn mcts_config(&self, seed: Option<u64>) -> MctsConfig {
        let mut config = MctsConfig::default()
            .with_timeout(self.timeout())
            .with_tree_policy(self.tree_policy.into())
            .with_exploration(self.exploration);
        if self.max_entries > 0 {
            config = config.with_max_entries(self.max_entries);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        config
    }
}
