//! Transposition-style value store.
//!
//! The store replaces an explicit search tree: it is a flat map from game
//! state to visit statistics. Positions reached through different move orders
//! share one entry, and adjacency is recomputed by stepping states on demand.
//!
//! Entries are never evicted. With `max_entries` set, states beyond the limit
//! are simply not admitted; states already present keep being updated.

use std::collections::HashMap;
use std::hash::Hash;

/// Estimate reported for states the store has never seen.
pub const UNVISITED: f64 = f64::NEG_INFINITY;

/// Visit statistics of a single state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeStats {
    /// Number of backups that passed through this state
    pub visits: u32,

    /// Sum of the evaluations credited to this state
    pub value_sum: f64,
}

impl NodeStats {
    /// Mean evaluation, `UNVISITED` if the state was never credited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            UNVISITED
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

/// Map from state to visit count and cumulative evaluation.
#[derive(Debug, Clone)]
pub struct ValueStore<S> {
    entries: HashMap<S, NodeStats>,
    max_entries: Option<usize>,
}

impl<S: Eq + Hash + Clone> ValueStore<S> {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: None,
        }
    }

    /// Create an empty store admitting at most `max_entries` distinct states.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: Some(max_entries),
        }
    }

    /// Mean evaluation of `state`, or `UNVISITED` if it has no entry.
    #[inline]
    pub fn estimate(&self, state: &S) -> f64 {
        self.entries
            .get(state)
            .map_or(UNVISITED, NodeStats::mean_value)
    }

    /// Credit every state of `chain` with one visit and `evaluation`.
    pub fn update(&mut self, chain: &[S], evaluation: f64) {
        for state in chain {
            if let Some(stats) = self.entries.get_mut(state) {
                stats.visits += 1;
                stats.value_sum += evaluation;
                continue;
            }

            if self.is_full() {
                continue;
            }

            self.entries.insert(
                state.clone(),
                NodeStats {
                    visits: 1,
                    value_sum: evaluation,
                },
            );
        }
    }

    /// Statistics of `state`, if present.
    #[inline]
    pub fn get(&self, state: &S) -> Option<&NodeStats> {
        self.entries.get(state)
    }

    /// Visit count of `state` (0 if absent).
    #[inline]
    pub fn visits(&self, state: &S) -> u32 {
        self.entries.get(state).map_or(0, |stats| stats.visits)
    }

    /// Whether `state` has been credited at least once.
    #[inline]
    pub fn contains(&self, state: &S) -> bool {
        self.entries.contains_key(state)
    }

    /// Number of distinct states stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity limit, if any.
    #[inline]
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Whether no further states will be admitted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.max_entries
            .map_or(false, |max| self.entries.len() >= max)
    }

    /// Drop every entry. The capacity limit is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over all stored states and their statistics.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &NodeStats)> {
        self.entries.iter()
    }
}

impl<S: Eq + Hash + Clone> Default for ValueStore<S> {
    fn default() -> Self {
        Self::new()
    }
}
