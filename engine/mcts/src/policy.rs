//! Tree policies for the selection phase.
//!
//! A tree policy decides which action to follow out of a state that is
//! already present in the value store. The engine ships the uniform random
//! policy (default) and UCB1.

use engine_core::State;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::config::{MctsConfig, TreePolicyKind};
use crate::store::ValueStore;

/// Rule for choosing the next visited child during selection.
pub trait TreePolicy<S: State> {
    /// Return the index into `actions` to follow from `state`.
    ///
    /// `actions` is non-empty and equals `state.actions()`.
    fn choose(
        &mut self,
        state: &S,
        actions: &[S::Action],
        store: &ValueStore<S>,
        rng: &mut ChaCha20Rng,
    ) -> usize;
}

/// Uniform random choice among the legal actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicy;

impl<S: State> TreePolicy<S> for UniformPolicy {
    fn choose(
        &mut self,
        _state: &S,
        actions: &[S::Action],
        _store: &ValueStore<S>,
        rng: &mut ChaCha20Rng,
    ) -> usize {
        rng.gen_range(0..actions.len())
    }
}

/// UCB1: `estimate(child) + c * sqrt(2 * ln(N_parent) / N_child)`.
///
/// Children without an entry are tried first, in enumeration order.
#[derive(Debug, Clone, Copy)]
pub struct Ucb1Policy {
    pub exploration: f64,
}

impl Ucb1Policy {
    pub fn new(exploration: f64) -> Self {
        Self { exploration }
    }

    /// UCB1 score of a child with the given statistics.
    #[inline]
    pub fn score(&self, estimate: f64, parent_visits: u32, child_visits: u32) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY;
        }
        let bonus = (2.0 * (parent_visits.max(1) as f64).ln() / child_visits as f64).sqrt();
        estimate + self.exploration * bonus
    }
}

impl Default for Ucb1Policy {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<S: State> TreePolicy<S> for Ucb1Policy {
    fn choose(
        &mut self,
        state: &S,
        actions: &[S::Action],
        store: &ValueStore<S>,
        _rng: &mut ChaCha20Rng,
    ) -> usize {
        let parent_visits = store.visits(state);
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (idx, action) in actions.iter().enumerate() {
            let child = state.step(action);
            let score = self.score(store.estimate(&child), parent_visits, store.visits(&child));
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }

        best
    }
}

/// Tree policy selected at runtime from [`MctsConfig`].
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredPolicy {
    Uniform(UniformPolicy),
    Ucb1(Ucb1Policy),
}

impl ConfiguredPolicy {
    pub fn from_config(config: &MctsConfig) -> Self {
        match config.tree_policy {
            TreePolicyKind::Uniform => ConfiguredPolicy::Uniform(UniformPolicy),
            TreePolicyKind::Ucb1 => ConfiguredPolicy::Ucb1(Ucb1Policy::new(config.exploration)),
        }
    }
}

impl<S: State> TreePolicy<S> for ConfiguredPolicy {
    fn choose(
        &mut self,
        state: &S,
        actions: &[S::Action],
        store: &ValueStore<S>,
        rng: &mut ChaCha20Rng,
    ) -> usize {
        match self {
            ConfiguredPolicy::Uniform(p) => p.choose(state, actions, store, rng),
            ConfiguredPolicy::Ucb1(p) => p.choose(state, actions, store, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Root 0 with children 1..=n, all terminal.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Fan(u8, u8);

    impl State for Fan {
        type Action = u8;

        fn actions(&self) -> Vec<u8> {
            if self.0 == 0 {
                (1..=self.1).collect()
            } else {
                Vec::new()
            }
        }

        fn step(&self, action: &u8) -> Self {
            Fan(*action, self.1)
        }
    }

    #[test]
    fn test_uniform_policy_stays_in_range() {
        let root = Fan(0, 4);
        let actions = root.actions();
        let store = ValueStore::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut policy = UniformPolicy;

        let mut seen = [false; 4];
        for _ in 0..200 {
            let idx = policy.choose(&root, &actions, &store, &mut rng);
            assert!(idx < actions.len());
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "every action should be drawn");
    }

    #[test]
    fn test_uniform_policy_is_reproducible() {
        let root = Fan(0, 9);
        let actions = root.actions();
        let store = ValueStore::new();
        let mut rng1 = ChaCha20Rng::seed_from_u64(7);
        let mut rng2 = ChaCha20Rng::seed_from_u64(7);

        for _ in 0..50 {
            assert_eq!(
                UniformPolicy.choose(&root, &actions, &store, &mut rng1),
                UniformPolicy.choose(&root, &actions, &store, &mut rng2)
            );
        }
    }

    #[test]
    fn test_ucb1_prefers_unvisited_child() {
        let root = Fan(0, 3);
        let actions = root.actions();
        let mut store = ValueStore::new();
        store.update(&[root.clone(), Fan(1, 3)], 1.0);
        store.update(&[root.clone(), Fan(3, 3)], 1.0);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let idx = Ucb1Policy::default().choose(&root, &actions, &store, &mut rng);
        assert_eq!(actions[idx], 2);
    }

    #[test]
    fn test_ucb1_exploits_with_zero_exploration() {
        let root = Fan(0, 2);
        let actions = root.actions();
        let mut store = ValueStore::new();
        store.update(&[root.clone(), Fan(1, 2)], -1.0);
        store.update(&[root.clone(), Fan(2, 2)], 0.5);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let idx = Ucb1Policy::new(0.0).choose(&root, &actions, &store, &mut rng);
        assert_eq!(actions[idx], 2);
    }

    #[test]
    fn test_ucb1_score() {
        let policy = Ucb1Policy::new(1.0);
        assert_eq!(policy.score(0.0, 10, 0), f64::INFINITY);

        // 0.5 + sqrt(2 * ln(100) / 10) ~= 0.5 + 0.9597
        let score = policy.score(0.5, 100, 10);
        assert!((score - 1.4597).abs() < 1e-3);
    }

    #[test]
    fn test_configured_policy_from_config() {
        let config = MctsConfig::default()
            .with_tree_policy(TreePolicyKind::Ucb1)
            .with_exploration(2.0);
        match ConfiguredPolicy::from_config(&config) {
            ConfiguredPolicy::Ucb1(p) => assert!((p.exploration - 2.0).abs() < 1e-12),
            other => panic!("expected UCB1, got {:?}", other),
        }
        assert!(matches!(
            ConfiguredPolicy::from_config(&MctsConfig::default()),
            ConfiguredPolicy::Uniform(_)
        ));
    }
}
