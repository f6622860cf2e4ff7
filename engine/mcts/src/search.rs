//! MCTS search implementation.
//!
//! Implements the time-bounded MCTS loop:
//! 1. Selection: Walk visited states with the tree policy to a new or terminal state
//! 2. Rollout: Play uniformly random moves to a terminal state
//! 3. Evaluation: Score the terminal state with the evaluator
//! 4. Backup: Credit every state of the selection chain with that score
//!
//! When the timeout has elapsed the root's successors are compared by their
//! stored estimate and the first best action is returned.

use std::time::{Duration, Instant};

use engine_core::State;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::policy::{ConfiguredPolicy, TreePolicy};
use crate::rollout::rollout_with_depth;
use crate::store::ValueStore;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Cannot search from a terminal state")]
    TerminalState,

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Tree policy chose index {index} but only {available} actions exist")]
    InvalidPolicyChoice { index: usize, available: usize },
}

/// Statistics about the last search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    /// Completed select/rollout/backup iterations
    pub iterations: u64,

    /// Wall-clock time spent, including the final decision
    pub elapsed: Duration,

    /// Distinct states in the value store after the search
    pub store_len: usize,

    /// Estimate of the state reached by the returned action
    pub best_estimate: f64,
}

/// Walk from `root` through states already in `store`.
///
/// The returned chain starts with `root` and ends at the first state that is
/// either absent from the store or terminal.
pub fn select<S, P>(
    root: &S,
    store: &ValueStore<S>,
    policy: &mut P,
    rng: &mut ChaCha20Rng,
) -> Result<Vec<S>, SearchError>
where
    S: State,
    P: TreePolicy<S>,
{
    let mut chain = vec![root.clone()];
    let mut current = root.clone();

    while store.contains(&current) {
        let actions = current.actions();
        if actions.is_empty() {
            break;
        }

        let index = policy.choose(&current, &actions, store, rng);
        let action = actions
            .get(index)
            .ok_or(SearchError::InvalidPolicyChoice {
                index,
                available: actions.len(),
            })?;

        current = current.step(action);
        chain.push(current.clone());
    }

    Ok(chain)
}

/// Time-bounded MCTS engine.
///
/// The value store lives as long as the engine and accumulates across
/// `search` calls. Set `max_entries` in the config or call [`Mcts::reset`]
/// for long-running use. A search that starts with a full store clears it
/// first, so the new root and its successors can be admitted.
pub struct Mcts<S: State, E, P = ConfiguredPolicy> {
    store: ValueStore<S>,
    evaluator: E,
    policy: P,
    config: MctsConfig,
    rng: ChaCha20Rng,
    last_stats: Option<SearchStats>,
}

impl<S, E> Mcts<S, E, ConfiguredPolicy>
where
    S: State,
    E: Evaluator<S>,
{
    /// Create an engine using the tree policy named in `config`.
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        let policy = ConfiguredPolicy::from_config(&config);
        Self::with_policy(evaluator, policy, config)
    }
}

impl<S, E, P> Mcts<S, E, P>
where
    S: State,
    E: Evaluator<S>,
    P: TreePolicy<S>,
{
    /// Create an engine with a custom tree policy.
    pub fn with_policy(evaluator: E, policy: P, config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let store = match config.max_entries {
            Some(max) => ValueStore::with_capacity_limit(max),
            None => ValueStore::new(),
        };

        Self {
            store,
            evaluator,
            policy,
            config,
            rng,
            last_stats: None,
        }
    }

    /// Run iterations until the timeout elapses, then pick the best action.
    pub fn search(&mut self, root: &S) -> Result<S::Action, SearchError> {
        if root.is_final() {
            return Err(SearchError::TerminalState);
        }

        if self.store.is_full() {
            warn!(
                store_len = self.store.len(),
                "Value store full at search start, clearing it"
            );
            self.store.clear();
        }

        let start = Instant::now();
        let mut iterations = 0u64;

        while start.elapsed() < self.config.timeout {
            self.iterate(root)?;
            iterations += 1;
        }

        let (action, best_estimate) = self.best_action(root)?;

        let stats = SearchStats {
            iterations,
            elapsed: start.elapsed(),
            store_len: self.store.len(),
            best_estimate,
        };
        debug!(
            iterations = stats.iterations,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            store_len = stats.store_len,
            best_estimate = stats.best_estimate,
            action = ?action,
            "MCTS search complete"
        );
        self.last_stats = Some(stats);

        Ok(action)
    }

    /// Run a single iteration (select -> rollout -> evaluate -> backup).
    pub fn iterate(&mut self, root: &S) -> Result<(), SearchError> {
        let chain = select(root, &self.store, &mut self.policy, &mut self.rng)?;
        let leaf = chain.last().unwrap_or(root);

        let (terminal, depth) = rollout_with_depth(leaf, &mut self.rng);
        let evaluation = self.evaluator.evaluate(&terminal)?;

        self.store.update(&chain, evaluation);

        trace!(
            chain_len = chain.len(),
            rollout_depth = depth,
            evaluation,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Greedy decision over the root's immediate successors.
    ///
    /// Returns the first action, in enumeration order, whose successor has
    /// the highest estimate, together with that estimate. Successors missing
    /// from the store rank below any visited one.
    pub fn best_action(&self, root: &S) -> Result<(S::Action, f64), SearchError> {
        let mut best: Option<(S::Action, f64)> = None;

        for action in root.actions() {
            let estimate = self.store.estimate(&root.step(&action));
            let better = match &best {
                None => true,
                Some((_, best_estimate)) => estimate > *best_estimate,
            };
            if better {
                best = Some((action, estimate));
            }
        }

        best.ok_or(SearchError::TerminalState)
    }

    /// Forget every stored state.
    pub fn reset(&mut self) {
        self.store.clear();
        self.last_stats = None;
    }

    /// Get the value store (for inspection/debugging).
    pub fn store(&self) -> &ValueStore<S> {
        &self.store
    }

    /// Get the search configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Get the evaluator scoring terminal states.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Statistics of the most recent `search` call.
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }
}
