//! MCTS configuration parameters.

use std::time::Duration;

/// Default wall-clock budget per search.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Rule used during selection to descend into already-visited states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreePolicyKind {
    /// Uniform random choice among legal actions.
    #[default]
    Uniform,
    /// UCB1: estimate plus an exploration bonus.
    Ucb1,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Wall-clock budget of one search. Checked before each iteration, so a
    /// search may overrun by the duration of a single iteration.
    pub timeout: Duration,

    /// Tree policy used during selection.
    pub tree_policy: TreePolicyKind,

    /// Exploration constant `c` of the UCB1 bonus
    /// `c * sqrt(2 * ln(N_parent) / N_child)`. Ignored by the uniform policy.
    pub exploration: f64,

    /// Maximum number of distinct states kept in the value store.
    /// `None` keeps every visited state for the lifetime of the engine.
    pub max_entries: Option<usize>,

    /// Seed for the engine's random generator. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            tree_policy: TreePolicyKind::Uniform,
            exploration: 1.0,
            max_entries: None,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, reproducible config for testing.
    pub fn for_testing() -> Self {
        Self {
            timeout: Duration::from_millis(50),
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Builder pattern: set the search timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder pattern: set the search timeout in milliseconds.
    pub fn with_timeout_ms(self, ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(ms))
    }

    /// Builder pattern: set the tree policy.
    pub fn with_tree_policy(mut self, kind: TreePolicyKind) -> Self {
        self.tree_policy = kind;
        self
    }

    /// Builder pattern: set the UCB1 exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: cap the number of stored states.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Builder pattern: seed the random generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
