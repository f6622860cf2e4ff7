//! Evaluator trait for scoring game states.
//!
//! The evaluator maps the terminal state reached by a rollout to a scalar
//! reward from one player's perspective. Any `Fn(&S) -> f64` closure is an
//! evaluator; fallible evaluators implement the trait directly.

use engine_core::{calculate_reward, Player, TwoPlayerState};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),
}

/// Trait for state evaluators.
///
/// Returned values must be finite: the value store uses negative infinity as
/// the estimate of states it has never seen.
pub trait Evaluator<S> {
    /// Score `state` from the evaluator's player perspective.
    fn evaluate(&self, state: &S) -> Result<f64, EvaluatorError>;
}

impl<S, F> Evaluator<S> for F
where
    F: Fn(&S) -> f64,
{
    fn evaluate(&self, state: &S) -> Result<f64, EvaluatorError> {
        Ok(self(state))
    }
}

/// Win/loss/draw evaluator for two-player games.
///
/// Scores `+1.0` when `player` has won, `-1.0` when the opponent has won and
/// `0.0` for draws and unfinished games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeEvaluator {
    pub player: Player,
}

impl OutcomeEvaluator {
    pub fn new(player: Player) -> Self {
        Self { player }
    }
}

impl<S: TwoPlayerState> Evaluator<S> for OutcomeEvaluator {
    fn evaluate(&self, state: &S) -> Result<f64, EvaluatorError> {
        Ok(calculate_reward(state.winner(), self.player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::State;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Finished(Option<Player>);

    impl State for Finished {
        type Action = ();

        fn actions(&self) -> Vec<()> {
            Vec::new()
        }

        fn step(&self, _action: &()) -> Self {
            self.clone()
        }
    }

    impl TwoPlayerState for Finished {
        fn player_to_move(&self) -> Player {
            Player::One
        }

        fn winner(&self) -> Option<Player> {
            self.0
        }
    }

    #[test]
    fn test_closure_evaluator() {
        let eval = |s: &Finished| if s.0.is_some() { 0.5 } else { -0.5 };
        assert_eq!(eval.evaluate(&Finished(Some(Player::Two))).unwrap(), 0.5);
        assert_eq!(eval.evaluate(&Finished(None)).unwrap(), -0.5);
    }

    #[test]
    fn test_outcome_evaluator() {
        let eval = OutcomeEvaluator::new(Player::One);
        assert_eq!(eval.evaluate(&Finished(Some(Player::One))).unwrap(), 1.0);
        assert_eq!(eval.evaluate(&Finished(Some(Player::Two))).unwrap(), -1.0);
        assert_eq!(eval.evaluate(&Finished(None)).unwrap(), 0.0);
    }

    #[test]
    fn test_outcome_evaluator_perspective_is_symmetric() {
        let one = OutcomeEvaluator::new(Player::One);
        let two = OutcomeEvaluator::new(Player::Two);
        let state = Finished(Some(Player::Two));
        let a = one.evaluate(&state).unwrap();
        let b = two.evaluate(&state).unwrap();
        assert_eq!(a, -b);
    }
}
