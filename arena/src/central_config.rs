//! Centralized configuration loading from arena.toml.
//!
//! This module provides the file layer of the arena configuration: built-in
//! defaults, overridden by an optional arena.toml. Environment variables and
//! CLI flags are layered on top in `config.rs`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{AgentKind, GameKind, PolicyKind};

pub mod defaults {
    pub const LOG_LEVEL: &str = "info";
    pub const ROUNDS: u32 = 100;
    pub const WIDTH: usize = 8;
    pub const HEIGHT: usize = 7;
    pub const TIMEOUT_MS: u64 = 1000;
    pub const EXPLORATION: f64 = 1.0;
    pub const MAX_ENTRIES: usize = 0;
}

/// Root configuration structure matching arena.toml
#[derive(Debug, Deserialize, Default)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub tournament: TournamentConfig,
    #[serde(default)]
    pub connect4: Connect4Config,
    #[serde(default)]
    pub mcts: MctsConfig,
}

fn d_log_level() -> String {
    defaults::LOG_LEVEL.into()
}
fn d_rounds() -> u32 {
    defaults::ROUNDS
}
fn d_player_a() -> AgentKind {
    AgentKind::Mcts
}
fn d_player_b() -> AgentKind {
    AgentKind::Random
}
fn d_width() -> usize {
    defaults::WIDTH
}
fn d_height() -> usize {
    defaults::HEIGHT
}
fn d_timeout_ms() -> u64 {
    defaults::TIMEOUT_MS
}
fn d_exploration() -> f64 {
    defaults::EXPLORATION
}
fn d_max_entries() -> usize {
    defaults::MAX_ENTRIES
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Master seed for the tournament and its agents
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.into(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    #[serde(default = "d_rounds")]
    pub rounds: u32,
    #[serde(default)]
    pub game: GameKind,
    /// Competitor playing as player 1
    #[serde(default = "d_player_a")]
    pub player_a: AgentKind,
    /// Competitor playing as player 2
    #[serde(default = "d_player_b")]
    pub player_b: AgentKind,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: defaults::ROUNDS,
            game: GameKind::default(),
            player_a: AgentKind::Mcts,
            player_b: AgentKind::Random,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Connect4Config {
    #[serde(default = "d_width")]
    pub width: usize,
    #[serde(default = "d_height")]
    pub height: usize,
}

impl Default for Connect4Config {
    fn default() -> Self {
        Self {
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub tree_policy: PolicyKind,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// Cap on stored states per agent (0 for unbounded)
    #[serde(default = "d_max_entries")]
    pub max_entries: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::TIMEOUT_MS,
            tree_policy: PolicyKind::default(),
            exploration: defaults::EXPLORATION,
            max_entries: defaults::MAX_ENTRIES,
        }
    }
}

/// Standard locations to search for arena.toml
const CONFIG_SEARCH_PATHS: &[&str] = &["arena.toml", "../arena.toml"];

/// Load the central configuration from arena.toml.
///
/// `ARENA_CONFIG` names an explicit file; otherwise the standard locations
/// are searched. Missing or unparsable files fall back to built-in defaults.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("ARENA_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from ARENA_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "ARENA_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No arena.toml found, using built-in defaults");
    CentralConfig::default()
}

fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                CentralConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            CentralConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CentralConfig::default();
        assert_eq!(config.common.log_level, "info");
        assert_eq!(config.common.seed, None);
        assert_eq!(config.tournament.rounds, 100);
        assert_eq!(config.tournament.game, GameKind::Connect4);
        assert_eq!(config.tournament.player_a, AgentKind::Mcts);
        assert_eq!(config.tournament.player_b, AgentKind::Random);
        assert_eq!(config.connect4.width, 8);
        assert_eq!(config.connect4.height, 7);
        assert_eq!(config.mcts.timeout_ms, 1000);
        assert_eq!(config.mcts.tree_policy, PolicyKind::Uniform);
        assert_eq!(config.mcts.max_entries, 0);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
[common]
log_level = "debug"
seed = 7

[tournament]
rounds = 10
game = "tictactoe"
player_a = "human"
player_b = "mcts"

[mcts]
timeout_ms = 250
tree_policy = "ucb1"
exploration = 1.5
max_entries = 50000
"#;
        let config: CentralConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.common.log_level, "debug");
        assert_eq!(config.common.seed, Some(7));
        assert_eq!(config.tournament.rounds, 10);
        assert_eq!(config.tournament.game, GameKind::Tictactoe);
        assert_eq!(config.tournament.player_a, AgentKind::Human);
        assert_eq!(config.tournament.player_b, AgentKind::Mcts);
        assert_eq!(config.mcts.timeout_ms, 250);
        assert_eq!(config.mcts.tree_policy, PolicyKind::Ucb1);
        assert!((config.mcts.exploration - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.mcts.max_entries, 50000);
    }

    #[test]
    fn test_partial_config() {
        let toml_content = r#"
[connect4]
width = 7
"#;
        let config: CentralConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.connect4.width, 7);
        assert_eq!(config.connect4.height, 7);
        assert_eq!(config.tournament.rounds, 100);
        assert_eq!(config.mcts.timeout_ms, 1000);
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        let toml_content = r#"
[tournament]
player_a = "oracle"
"#;
        assert!(toml::from_str::<CentralConfig>(toml_content).is_err());
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let config = load_from_path(Path::new("/nonexistent/arena.toml"));
        assert_eq!(config.tournament.rounds, defaults::ROUNDS);
    }
}
