//! Time-bounded Monte Carlo Tree Search (MCTS).
//!
//! This crate provides a game-agnostic MCTS engine that works with any
//! position implementing the `engine-core` [`State`](engine_core::State) trait.
//!
//! # Overview
//!
//! Instead of an explicit tree, the engine keeps a flat
//! [`ValueStore`] mapping each visited state to its visit count and
//! cumulative evaluation. Each iteration consists of four phases:
//!
//! 1. **Selection**: From the root, follow the tree policy through states
//!    already in the store until reaching a new or terminal state
//! 2. **Rollout**: Play uniformly random moves to the end of the game
//! 3. **Evaluation**: Score the final state with the [`Evaluator`]
//! 4. **Backup**: Credit every state of the selection chain with the score
//!
//! Iterations repeat until the configured timeout elapses. The action whose
//! successor has the highest estimate is returned; ties go to the action that
//! comes first in `actions()` order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::Player;
//! use mcts::{Mcts, MctsConfig, OutcomeEvaluator};
//!
//! let config = MctsConfig::default().with_timeout_ms(200).with_seed(42);
//! let mut engine = Mcts::new(OutcomeEvaluator::new(Player::One), config);
//!
//! let state = games_tictactoe::State::new();
//! let action = engine.search(&state)?;
//! println!("Best action: {:?}", action);
//! println!("Stats: {:?}", engine.last_stats());
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `timeout`: Wall-clock budget per search (default: 1000 ms)
//! - `tree_policy`: Uniform random (default) or UCB1 selection
//! - `exploration`: UCB1 exploration constant (default: 1.0)
//! - `max_entries`: Optional cap on stored states
//! - `seed`: Seed for the engine's `ChaCha20Rng`
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                            Mcts                             |
//! +-------------------------------------------------------------+
//! |  +-------------+  +-------------+  +---------------------+  |
//! |  | ValueStore  |  | TreePolicy  |  |     Evaluator       |  |
//! |  | (state map) |  | (selection) |  | (terminal scoring)  |  |
//! |  +------+------+  +------+------+  +----------+----------+  |
//! |         |                |                    |             |
//! |         v                v                    v             |
//! |  +-------------------------------------------------------+  |
//! |  |        select -> rollout -> evaluate -> backup        |  |
//! |  +-------------------------------------------------------+  |
//! +-------------------------------------------------------------+
//! ```

pub mod config;
pub mod evaluator;
pub mod policy;
pub mod rollout;
pub mod search;
pub mod store;

// Re-export main types
pub use config::{MctsConfig, TreePolicyKind, DEFAULT_TIMEOUT_MS};
pub use evaluator::{Evaluator, EvaluatorError, OutcomeEvaluator};
pub use policy::{ConfiguredPolicy, TreePolicy, Ucb1Policy, UniformPolicy};
pub use rollout::{rollout, rollout_with_depth};
pub use search::{select, Mcts, SearchError, SearchStats};
pub use store::{NodeStats, ValueStore, UNVISITED};
