//! Shared utilities for two-player game implementations
//!
//! This module provides the player type, the two-player state queries and
//! the reward convention used across the game crates and the evaluators.

use crate::typed::State;
use std::fmt;

/// One of the two players of a zero-sum game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The opponent.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Board cell value for this player (0 is reserved for empty cells).
    #[inline]
    pub fn cell(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Player owning a board cell, `None` for empty or invalid cells.
    #[inline]
    pub fn from_cell(cell: u8) -> Option<Player> {
        match cell {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.cell())
    }
}

/// Queries available on positions of a two-player, turn-based game.
pub trait TwoPlayerState: State {
    /// Player whose turn it is.
    fn player_to_move(&self) -> Player;

    /// Winner of the game, `None` while ongoing or when drawn.
    fn winner(&self) -> Option<Player>;
}

/// Calculate reward for a two-player zero-sum game.
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `-1.0` if `perspective` lost
/// * `0.0` for draws or ongoing games
///
/// # Example
/// ```
/// use engine_core::{calculate_reward, Player};
///
/// assert_eq!(calculate_reward(Some(Player::One), Player::One), 1.0);
/// assert_eq!(calculate_reward(Some(Player::One), Player::Two), -1.0);
/// assert_eq!(calculate_reward(None, Player::One), 0.0);
/// ```
#[inline]
pub fn calculate_reward(winner: Option<Player>, perspective: Player) -> f64 {
    match winner {
        None => 0.0,
        Some(w) if w == perspective => 1.0,
        Some(_) => -1.0,
    }
}
