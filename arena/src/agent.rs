//! Competitors of a tournament
//!
//! An agent picks an action for the position it is handed. Three kinds are
//! available: console input, uniform random moves, and MCTS.

use anyhow::{anyhow, bail, Context, Result};
use engine_core::{ParseAction, Player, State, TwoPlayerState};
use mcts::{Mcts, MctsConfig, OutcomeEvaluator};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::debug;

use crate::config::{AgentKind, Config};

/// Entity that picks an action among the legal ones.
pub trait Agent<S: State> {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Choose an action for the player to move in `state`.
    fn act(&mut self, state: &S) -> Result<S::Action>;
}

/// Agent that selects actions uniformly at random.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl<S: State> Agent<S> for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, state: &S) -> Result<S::Action> {
        state
            .actions()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| anyhow!("no legal actions in a terminal state"))
    }
}

/// Agent that lets a human play through console input.
///
/// The position is printed before every prompt; input that does not parse
/// to a legal action is reported and prompted for again.
pub struct HumanAgent<R, W> {
    input: R,
    output: W,
}

impl HumanAgent<StdinLock<'static>, Stdout> {
    /// Human playing on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

impl<S, R, W> Agent<S> for HumanAgent<R, W>
where
    S: ParseAction + Display,
    R: BufRead,
    W: Write,
{
    fn name(&self) -> &str {
        "human"
    }

    fn act(&mut self, state: &S) -> Result<S::Action> {
        writeln!(self.output, "{}", state)?;
        loop {
            write!(self.output, "Enter your move: ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read move from input")?;
            if read == 0 {
                bail!("input closed before a move was entered");
            }

            match state.parse_action(&line) {
                Ok(action) => return Ok(action),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }
}

/// Agent wrapping a time-bounded MCTS engine.
///
/// The engine's value store is kept across moves and rounds.
pub struct MctsAgent<S: State> {
    engine: Mcts<S, OutcomeEvaluator>,
}

impl<S: TwoPlayerState> MctsAgent<S> {
    /// Create an agent maximizing the outcome for `player`.
    pub fn new(player: Player, config: MctsConfig) -> Self {
        Self {
            engine: Mcts::new(OutcomeEvaluator::new(player), config),
        }
    }

    /// Read-only access to the engine (for inspection/debugging)
    #[allow(dead_code)]
    pub fn engine(&self) -> &Mcts<S, OutcomeEvaluator> {
        &self.engine
    }
}

impl<S: TwoPlayerState> Agent<S> for MctsAgent<S> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn act(&mut self, state: &S) -> Result<S::Action> {
        let action = self.engine.search(state)?;
        if let Some(stats) = self.engine.last_stats() {
            debug!(
                player = %self.engine.evaluator().player,
                iterations = stats.iterations,
                store_len = stats.store_len,
                best_estimate = stats.best_estimate,
                "MCTS agent moved"
            );
        }
        Ok(action)
    }
}

/// Build the competitor of the given kind for `player`.
pub fn build_agent<S>(
    kind: AgentKind,
    player: Player,
    config: &Config,
    seed: Option<u64>,
) -> Box<dyn Agent<S>>
where
    S: TwoPlayerState + ParseAction + Display + 'static,
{
    match kind {
        AgentKind::Human => Box::new(HumanAgent::stdio()),
        AgentKind::Random => match seed {
            Some(seed) => Box::new(RandomAgent::with_seed(seed)),
            None => Box::new(RandomAgent::new()),
        },
        AgentKind::Mcts => Box::new(MctsAgent::new(player, config.mcts_config(seed))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::{Action, State as TicTacToeState};
    use std::io::Cursor;

    fn human(input: &str) -> HumanAgent<Cursor<Vec<u8>>, Vec<u8>> {
        HumanAgent::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_random_agent_picks_legal_actions() {
        let mut agent = RandomAgent::with_seed(42);
        let state = TicTacToeState::new().make_move(4).make_move(0);
        for _ in 0..50 {
            let action = agent.act(&state).unwrap();
            assert!(state.actions().contains(&action));
        }
    }

    #[test]
    fn test_random_agent_is_reproducible() {
        let state = TicTacToeState::new();
        let mut a = RandomAgent::with_seed(7);
        let mut b = RandomAgent::with_seed(7);
        for _ in 0..20 {
            assert_eq!(
                Agent::<TicTacToeState>::act(&mut a, &state).unwrap(),
                Agent::<TicTacToeState>::act(&mut b, &state).unwrap()
            );
        }
    }

    #[test]
    fn test_random_agent_fails_on_terminal_state() {
        let state = TicTacToeState::from_board([1, 1, 1, 2, 2, 0, 0, 0, 0], Player::Two);
        let mut agent = RandomAgent::with_seed(1);
        assert!(agent.act(&state).is_err());
    }

    #[test]
    fn test_human_agent_reads_move() {
        let mut agent = human("1,1\n");
        let action = agent.act(&TicTacToeState::new()).unwrap();
        assert_eq!(action, Action::Place(4));

        let output = String::from_utf8(agent.into_output()).unwrap();
        assert!(output.contains("player 1's turn"));
        assert!(output.contains("Enter your move: "));
    }

    #[test]
    fn test_human_agent_reprompts_on_bad_input() {
        let state = TicTacToeState::new().make_move(4);
        let mut agent = human("center\n1,1\n3,3\n0,2\n");

        let action = agent.act(&state).unwrap();
        assert_eq!(action, Action::Place(2));

        let output = String::from_utf8(agent.into_output()).unwrap();
        assert_eq!(output.matches("Enter your move: ").count(), 4);
        assert!(output.contains("Malformed action"));
        assert!(output.contains("not legal"));
        assert!(output.contains("out of range"));
    }

    #[test]
    fn test_human_agent_fails_on_closed_input() {
        let mut agent = human("");
        let err = agent.act(&TicTacToeState::new()).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_mcts_agent_takes_immediate_win() {
        let config = MctsConfig::for_testing().with_timeout_ms(200);
        let mut agent = MctsAgent::new(Player::One, config);
        let state = TicTacToeState::from_board([1, 1, 0, 2, 0, 0, 0, 0, 2], Player::One);

        assert_eq!(agent.act(&state).unwrap(), Action::Place(2));
        assert!(agent.engine().last_stats().unwrap().iterations > 0);
    }

    #[test]
    fn test_mcts_agent_keeps_store_between_moves() {
        let config = MctsConfig::for_testing().with_timeout_ms(10);
        let mut agent = MctsAgent::new(Player::Two, config);
        let state = TicTacToeState::new().make_move(4);

        agent.act(&state).unwrap();
        let after_first = agent.engine().store().len();
        agent.act(&state).unwrap();
        assert!(agent.engine().store().len() >= after_first);
        assert!(after_first > 0);
    }
}
