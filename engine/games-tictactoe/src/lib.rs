//! TicTacToe game implementation for the search engine
//!
//! This crate provides a reference implementation of TicTacToe on top of the
//! `engine-core` traits: [`State`] is an immutable position searchable by
//! the MCTS engine, and [`TicTacToe`] is the environment producing the
//! opening position of a match.
//!
//! # Board Layout
//!
//! Positions are numbered in row-major order, row 0 at the top:
//! ```text
//! |0|1|2|
//! |3|4|5|
//! |6|7|8|
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Player, State as _, TwoPlayerState};
//! use games_tictactoe::{Action, State};
//!
//! let state = State::new().make_move(0).make_move(3).make_move(1).make_move(4);
//! let won = state.step(&Action::Place(2));
//! assert_eq!(won.winner(), Some(Player::One));
//! assert!(won.actions().is_empty());
//! ```

use engine_core::{Environment, ParseAction, ParseActionError, Player, TwoPlayerState};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// Winning lines (rows, columns, diagonals).
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// TicTacToe game state
///
/// Equality and hashing cover the board and the player to move. The winner
/// is derived from the board and does not take part.
#[derive(Debug, Clone, Copy)]
pub struct State {
    /// Board representation: 0=empty, 1=X (player 1), 2=O (player 2)
    board: [u8; BOARD_SIZE],
    /// Player to move. Not switched by the winning move.
    current_player: Player,
    /// Cached result of `check_winner` on `board`
    winner: Option<Player>,
}

impl State {
    /// Create a new initial game state with player 1 (X) to move
    pub fn new() -> Self {
        Self::with_first_player(Player::One)
    }

    /// Create an empty board with the given player to move
    pub fn with_first_player(player: Player) -> Self {
        Self {
            board: [0; BOARD_SIZE],
            current_player: player,
            winner: None,
        }
    }

    /// Build a position from raw cells (0=empty, 1=X, 2=O).
    ///
    /// The winner is recomputed from the board; cells above 2 are treated
    /// as empty.
    pub fn from_board(board: [u8; BOARD_SIZE], to_move: Player) -> Self {
        let board = board.map(|cell| if cell > 2 { 0 } else { cell });
        Self {
            board,
            current_player: to_move,
            winner: Self::check_winner(&board),
        }
    }

    /// Raw board cells
    pub fn board(&self) -> &[u8; BOARD_SIZE] {
        &self.board
    }

    /// Owner of the cell at (row, col)
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        Player::from_cell(self.board[row * 3 + col])
    }

    /// Check if the board has no empty cell left
    pub fn is_full(&self) -> bool {
        self.board.iter().all(|&cell| cell != 0)
    }

    /// Check if the game is over (win or draw)
    pub fn is_done(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..BOARD_SIZE as u8)
            .filter(|&pos| self.board[pos as usize] == 0)
            .collect()
    }

    /// Make a move and return the new state
    pub fn make_move(&self, position: u8) -> State {
        if self.is_done() || position as usize >= BOARD_SIZE || self.board[position as usize] != 0
        {
            return *self; // Invalid move, return unchanged state
        }

        let mut new_state = *self;
        new_state.board[position as usize] = self.current_player.cell();

        // Check for winner
        new_state.winner = Self::check_winner(&new_state.board);

        // Switch player if game not over
        if new_state.winner.is_none() {
            new_state.current_player = self.current_player.other();
        }

        new_state
    }

    /// Check for a completed line on the board
    fn check_winner(board: &[u8; BOARD_SIZE]) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            if board[a] != 0 && board[a] == board[b] && board[b] == board[c] {
                Player::from_cell(board[a])
            } else {
                None
            }
        })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.current_player == other.current_player
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.current_player.hash(state);
    }
}

impl engine_core::State for State {
    type Action = Action;

    fn actions(&self) -> Vec<Action> {
        self.legal_moves().into_iter().map(Action::Place).collect()
    }

    fn step(&self, action: &Action) -> Self {
        self.make_move(action.position())
    }

    fn is_final(&self) -> bool {
        self.is_done()
    }
}

impl TwoPlayerState for State {
    fn player_to_move(&self) -> Player {
        self.current_player
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }
}

impl ParseAction for State {
    /// Accepts `row,col` (0-based) or a single position `0`-`8`.
    fn parse_action(&self, input: &str) -> Result<Action, ParseActionError> {
        let malformed = || ParseActionError::Malformed {
            input: input.trim().to_string(),
            expected: "'row,col' or a position 0-8",
        };

        let parts: Vec<&str> = input
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(str::trim)
            .collect();

        let position = match parts.as_slice() {
            [pos] => {
                let pos: usize = pos.parse().map_err(|_| malformed())?;
                if pos >= BOARD_SIZE {
                    return Err(ParseActionError::OutOfRange {
                        value: pos,
                        limit: BOARD_SIZE,
                    });
                }
                pos
            }
            [row, col] => {
                let row: usize = row.parse().map_err(|_| malformed())?;
                let col: usize = col.parse().map_err(|_| malformed())?;
                for value in [row, col] {
                    if value >= 3 {
                        return Err(ParseActionError::OutOfRange { value, limit: 3 });
                    }
                }
                row * 3 + col
            }
            _ => return Err(malformed()),
        };

        if self.is_done() || self.board[position] != 0 {
            return Err(ParseActionError::Illegal(input.trim().to_string()));
        }
        Ok(Action::Place(position as u8))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "player 1: X")?;
        writeln!(f, "player 2: O")?;
        writeln!(f, "-------")?;
        writeln!(f, "{}'s turn", self.current_player)?;
        writeln!(f, "-------")?;
        for row in self.board.chunks(3) {
            let cells: Vec<&str> = row
                .iter()
                .map(|&cell| match cell {
                    1 => "X",
                    2 => "O",
                    _ => " ",
                })
                .collect();
            writeln!(f, "|{}|", cells.join("|"))?;
        }
        Ok(())
    }
}

/// TicTacToe action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Place a piece at the given position (0-8)
    Place(u8),
}

impl Action {
    /// Get the position for this action
    pub fn position(&self) -> u8 {
        match self {
            Action::Place(pos) => *pos,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.position();
        write!(f, "{},{}", pos / 3, pos % 3)
    }
}

/// TicTacToe environment
///
/// Starts every match on an empty board with a uniformly random player to
/// move.
#[derive(Debug, Default, Clone, Copy)]
pub struct TicTacToe;

impl TicTacToe {
    /// Create a new TicTacToe environment
    pub fn new() -> Self {
        Self
    }
}

impl Environment for TicTacToe {
    type State = State;

    fn initialize(&self, rng: &mut ChaCha20Rng) -> State {
        let first = if rng.gen_bool(0.5) {
            Player::One
        } else {
            Player::Two
        };
        State::with_first_player(first)
    }
}
