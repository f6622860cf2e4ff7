//! Connect 4 game implementation for the search engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a vertically suspended grid (7 columns by 6 rows by default). The
//! objective is to be the first to form a horizontal, vertical, or diagonal
//! line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Environment, State as _};
//! use games_connect4::Connect4;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let env = Connect4::new(8, 7).expect("valid dimensions");
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let state = env.initialize(&mut rng);
//! assert_eq!(state.actions().len(), 8);
//! ```

use engine_core::{Environment, ParseAction, ParseActionError, Player, TwoPlayerState};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Default board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;

/// Supported range for either board dimension
pub const MIN_SIZE: usize = 4;
pub const MAX_SIZE: usize = 16;

/// Pieces in a row needed to win
const CONNECT: usize = 4;

/// Rejected board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "Invalid board size {cols}x{rows}: each dimension must be between {} and {}",
    MIN_SIZE,
    MAX_SIZE
)]
pub struct DimensionsError {
    pub cols: usize,
    pub rows: usize,
}

fn check_dimensions(cols: usize, rows: usize) -> Result<(), DimensionsError> {
    let valid = |n: usize| (MIN_SIZE..=MAX_SIZE).contains(&n);
    if valid(cols) && valid(rows) {
        Ok(())
    } else {
        Err(DimensionsError { cols, rows })
    }
}

/// Connect4 game state
///
/// Equality and hashing cover the dimensions, the board and the player to
/// move. The winner and column heights are derived from the board and do
/// not take part.
#[derive(Debug, Clone)]
pub struct State {
    cols: usize,
    rows: usize,
    /// Board representation: 0=empty, 1=X (player 1), 2=O (player 2)
    /// Stored in row-major order with row 0 at the bottom
    board: Vec<u8>,
    /// Player to move. Not switched by the winning move.
    current_player: Player,
    /// Set once a move completes a line
    winner: Option<Player>,
    /// Number of pieces in each column
    column_heights: Vec<u8>,
}

impl State {
    /// Create a new initial game state on the default 7x6 board with
    /// player 1 to move
    pub fn new() -> Self {
        Self::empty(COLS, ROWS, Player::One)
    }

    /// Create an empty board of the given size
    pub fn with_size(cols: usize, rows: usize, first: Player) -> Result<Self, DimensionsError> {
        check_dimensions(cols, rows)?;
        Ok(Self::empty(cols, rows, first))
    }

    fn empty(cols: usize, rows: usize, first: Player) -> Self {
        Self {
            cols,
            rows,
            board: vec![0; cols * rows],
            current_player: first,
            winner: None,
            column_heights: vec![0; cols],
        }
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Owner of the cell at (col, row), row 0 at the bottom
    pub fn cell(&self, col: usize, row: usize) -> Option<Player> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Player::from_cell(self.board[self.pos(col, row)])
    }

    /// Number of pieces in a column
    pub fn column_height(&self, col: usize) -> usize {
        self.column_heights.get(col).copied().unwrap_or(0) as usize
    }

    /// Check if every column is full
    pub fn is_full(&self) -> bool {
        self.column_heights.iter().all(|&h| h as usize >= self.rows)
    }

    /// Check if the game is over (win or draw)
    pub fn is_done(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    /// Get legal moves (columns that are not full)
    pub fn legal_moves(&self) -> Vec<u8> {
        if self.is_done() {
            return Vec::new();
        }

        (0..self.cols)
            .filter(|&col| (self.column_heights[col] as usize) < self.rows)
            .map(|col| col as u8)
            .collect()
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Drop a piece in the given column and return the new state
    pub fn drop_piece(&self, column: u8) -> State {
        let col = column as usize;

        // Check if move is valid
        if self.is_done() || col >= self.cols || self.column_heights[col] as usize >= self.rows {
            return self.clone(); // Invalid move, return unchanged state
        }

        let mut new_state = self.clone();
        let row = self.column_heights[col] as usize;
        let pos = self.pos(col, row);

        // Place the piece
        new_state.board[pos] = self.current_player.cell();
        new_state.column_heights[col] += 1;

        // Check for winner
        new_state.winner = new_state.check_winner_at(col, row);

        // Switch player if game not over
        if new_state.winner.is_none() {
            new_state.current_player = self.current_player.other();
        }

        new_state
    }

    /// Check if the piece at (col, row) creates a winning line
    fn check_winner_at(&self, col: usize, row: usize) -> Option<Player> {
        let cell = self.board[self.pos(col, row)];
        let player = Player::from_cell(cell)?;

        // Direction vectors: horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dc, dr) in directions {
            let count = 1 // Count the piece we just placed
                + self.run_length(col, row, dc, dr, cell)
                + self.run_length(col, row, -dc, -dr, cell);

            if count >= CONNECT {
                return Some(player);
            }
        }

        None
    }

    /// Count consecutive `cell` pieces starting one step from (col, row)
    fn run_length(&self, col: usize, row: usize, dc: i32, dr: i32, cell: u8) -> usize {
        let (cols, rows) = (self.cols as i32, self.rows as i32);
        let (mut c, mut r) = (col as i32 + dc, row as i32 + dr);
        let mut count = 0;
        while c >= 0 && c < cols && r >= 0 && r < rows {
            if self.board[self.pos(c as usize, r as usize)] != cell {
                break;
            }
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cols == other.cols
            && self.rows == other.rows
            && self.current_player == other.current_player
            && self.board == other.board
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cols.hash(state);
        self.rows.hash(state);
        self.current_player.hash(state);
        self.board.hash(state);
    }
}

impl engine_core::State for State {
    type Action = Action;

    fn actions(&self) -> Vec<Action> {
        self.legal_moves().into_iter().map(Action::Drop).collect()
    }

    fn step(&self, action: &Action) -> Self {
        self.drop_piece(action.column())
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
    /// Accepts a 0-based column index.
    fn parse_action(&self, input: &str) -> Result<Action, ParseActionError> {
        let trimmed = input.trim();
        let col: usize = trimmed.parse().map_err(|_| ParseActionError::Malformed {
            input: trimmed.to_string(),
            expected: "a column index",
        })?;

        if col >= self.cols {
            return Err(ParseActionError::OutOfRange {
                value: col,
                limit: self.cols,
            });
        }
        if self.is_done() || self.column_heights[col] as usize >= self.rows {
            return Err(ParseActionError::Illegal(trimmed.to_string()));
        }
        Ok(Action::Drop(col as u8))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "player 1: X")?;
        writeln!(f, "player 2: O")?;
        writeln!(f, "-------")?;
        writeln!(f, "{}'s turn", self.current_player)?;
        writeln!(f, "-------")?;
        for row in (0..self.rows).rev() {
            let line: String = (0..self.cols)
                .map(|col| match self.board[self.pos(col, row)] {
                    1 => 'X',
                    2 => 'O',
                    _ => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        // Column labels, last digit only on wide boards
        let labels: String = (0..self.cols)
            .filter_map(|col| char::from_digit((col % 10) as u32, 10))
            .collect();
        writeln!(f, "{}", labels)
    }
}

/// Connect4 action - drop a piece in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Drop a piece in the given column
    Drop(u8),
}

impl Action {
    /// Get the column for this action
    pub fn column(&self) -> u8 {
        match self {
            Action::Drop(col) => *col,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Connect4 environment
///
/// Starts every match on an empty board of the configured size with a
/// uniformly random player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connect4 {
    cols: usize,
    rows: usize,
}

impl Connect4 {
    /// Create a Connect4 environment with the given board size
    pub fn new(cols: usize, rows: usize) -> Result<Self, DimensionsError> {
        check_dimensions(cols, rows)?;
        Ok(Self { cols, rows })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl Default for Connect4 {
    fn default() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,
        }
    }
}

impl Environment for Connect4 {
    type State = State;

    fn initialize(&self, rng: &mut ChaCha20Rng) -> State {
        let first = if rng.gen_bool(0.5) {
            Player::One
        } else {
            Player::Two
        };
        State::empty(self.cols, self.rows, first)
    }
}
