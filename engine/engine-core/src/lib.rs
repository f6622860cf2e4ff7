//! Core traits and types shared by the search engine and the games
//!
//! This crate provides the abstractions every game position must satisfy:
//! - `State`: immutable position with legal actions and a pure `step`
//! - `Environment`: produces the initial state of a match
//! - `TwoPlayerState`: player-to-move and winner queries for zero-sum games
//! - `ParseAction`: structured parsing of human-entered moves

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use game_utils::{calculate_reward, Player, TwoPlayerState};
pub use typed::{Environment, ParseAction, ParseActionError, State};
