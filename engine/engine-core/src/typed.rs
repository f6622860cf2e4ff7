//! Typed game-position traits consumed by the search engine
//!
//! A game exposes its positions as values implementing [`State`]. The search
//! engine keys its statistics on state equality, so implementations must
//! define `Eq`/`Hash` over the canonical content of a position only.

use rand_chacha::ChaCha20Rng;
use std::fmt::Debug;
use std::hash::Hash;

/// One immutable game position.
///
/// # Contract
///
/// * `actions` returns the legal actions in a stable order; it is empty if and
///   only if the position is terminal.
/// * `step` never mutates the receiver, and stepping equal states with the
///   same action yields equal states.
/// * Following legal actions from any position reaches a terminal position in
///   finitely many steps.
/// * `Eq`/`Hash` cover exactly the content that determines the legal actions,
///   the player to move and the outcome. Fields derived from that content
///   (winner flags, column heights, ...) must not take part.
///
/// # Example
///
/// ```rust
/// use engine_core::State;
///
/// /// Players alternately remove one or two sticks; the game ends at zero.
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Sticks(u8);
///
/// impl State for Sticks {
///     type Action = u8;
///
///     fn actions(&self) -> Vec<u8> {
///         (1..=2).filter(|&n| n <= self.0).collect()
///     }
///
///     fn step(&self, action: &u8) -> Self {
///         Sticks(self.0 - action)
///     }
/// }
///
/// let start = Sticks(3);
/// assert_eq!(start.actions(), vec![1, 2]);
/// assert!(start.step(&2).step(&1).is_final());
/// ```
pub trait State: Clone + Eq + Hash + Debug {
    /// Action type. Opaque to the engine beyond passing it back to `step`.
    type Action: Clone + Debug + PartialEq;

    /// Legal actions in enumeration order. Empty iff the state is terminal.
    fn actions(&self) -> Vec<Self::Action>;

    /// Return the state reached by applying `action`.
    fn step(&self, action: &Self::Action) -> Self;

    /// Whether the state is terminal.
    ///
    /// Implementations may override this with a cheaper check, but it must
    /// always agree with `actions().is_empty()`.
    fn is_final(&self) -> bool {
        self.actions().is_empty()
    }
}

/// Factory for the initial position of a match.
pub trait Environment {
    type State: State;

    /// Create the initial state.
    ///
    /// The generator is used for any randomized setup, such as choosing which
    /// player moves first.
    fn initialize(&self, rng: &mut ChaCha20Rng) -> Self::State;
}

/// Structured parsing of a user-entered action for a given position.
pub trait ParseAction: State {
    /// Parse `input` into an action that is legal in `self`.
    fn parse_action(&self, input: &str) -> Result<Self::Action, ParseActionError>;
}

/// Error type for action parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("Malformed action '{input}': expected {expected}")]
    Malformed { input: String, expected: &'static str },
    #[error("Coordinate {value} out of range (must be below {limit})")]
    OutOfRange { value: usize, limit: usize },
    #[error("Action '{0}' is not legal in this position")]
    Illegal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Counts down to zero by one or two per move.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Countdown(u8);

    impl State for Countdown {
        type Action = u8;

        fn actions(&self) -> Vec<u8> {
            (1..=2).filter(|&n| n <= self.0).collect()
        }

        fn step(&self, action: &u8) -> Self {
            Countdown(self.0 - action)
        }
    }

    impl ParseAction for Countdown {
        fn parse_action(&self, input: &str) -> Result<u8, ParseActionError> {
            let value: u8 = input
                .trim()
                .parse()
                .map_err(|_| ParseActionError::Malformed {
                    input: input.to_string(),
                    expected: "1 or 2",
                })?;
            if !self.actions().contains(&value) {
                return Err(ParseActionError::Illegal(input.trim().to_string()));
            }
            Ok(value)
        }
    }

    struct CountdownEnv;

    impl Environment for CountdownEnv {
        type State = Countdown;

        fn initialize(&self, _rng: &mut ChaCha20Rng) -> Countdown {
            Countdown(5)
        }
    }

    #[test]
    fn test_is_final_defaults_to_empty_actions() {
        assert!(!Countdown(1).is_final());
        assert!(Countdown(0).is_final());
        assert!(Countdown(0).actions().is_empty());
    }

    #[test]
    fn test_step_is_pure() {
        let state = Countdown(4);
        let next = state.step(&2);
        assert_eq!(state, Countdown(4));
        assert_eq!(next, Countdown(2));
        assert_eq!(state.step(&2), next);
    }

    #[test]
    fn test_environment_initialize() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let state = CountdownEnv.initialize(&mut rng);
        assert_eq!(state.actions(), vec![1, 2]);
    }

    #[test]
    fn test_parse_action_errors() {
        let state = Countdown(1);
        assert_eq!(state.parse_action(" 1 "), Ok(1));
        assert!(matches!(
            state.parse_action("two"),
            Err(ParseActionError::Malformed { .. })
        ));
        assert_eq!(
            state.parse_action("2"),
            Err(ParseActionError::Illegal("2".to_string()))
        );
    }

    #[test]
    fn test_parse_error_messages() {
        let err = ParseActionError::OutOfRange { value: 9, limit: 3 };
        assert_eq!(
            err.to_string(),
            "Coordinate 9 out of range (must be below 3)"
        );
    }
}
