//! Series of rounds between two competitors
//!
//! Competitor A always plays as player 1 and competitor B as player 2. The
//! environment decides who opens each round. A round scores 1 for the winner
//! and 0 for the loser; a draw scores 0 for both.

use anyhow::{bail, Context, Result};
use engine_core::{Environment, Player, State, TwoPlayerState};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::agent::Agent;

/// Outcome of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: Option<Player>,
    /// Actions played before the terminal state
    pub moves: u32,
}

impl RoundResult {
    /// Points of (A, B) for this round
    pub fn scores(&self) -> (u32, u32) {
        match self.winner {
            Some(Player::One) => (1, 0),
            Some(Player::Two) => (0, 1),
            None => (0, 0),
        }
    }
}

/// Aggregate over all played rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentResult {
    pub rounds: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
}

impl TournamentResult {
    fn record(&mut self, round: &RoundResult) {
        self.rounds += 1;
        match round.winner {
            Some(Player::One) => self.wins_a += 1,
            Some(Player::Two) => self.wins_b += 1,
            None => self.draws += 1,
        }
    }

    /// Average score of competitor A
    pub fn score_a(&self) -> f64 {
        average(self.wins_a, self.rounds)
    }

    /// Average score of competitor B
    pub fn score_b(&self) -> f64 {
        average(self.wins_b, self.rounds)
    }
}

fn average(points: u32, rounds: u32) -> f64 {
    if rounds == 0 {
        0.0
    } else {
        points as f64 / rounds as f64
    }
}

pub struct Tournament<E: Environment> {
    env: E,
    agent_a: Box<dyn Agent<E::State>>,
    agent_b: Box<dyn Agent<E::State>>,
    rng: ChaCha20Rng,
}

impl<E> Tournament<E>
where
    E: Environment,
    E::State: TwoPlayerState,
{
    /// `rng` drives the environment's setup of every round.
    pub fn new(
        env: E,
        agent_a: Box<dyn Agent<E::State>>,
        agent_b: Box<dyn Agent<E::State>>,
        rng: ChaCha20Rng,
    ) -> Self {
        Self {
            env,
            agent_a,
            agent_b,
            rng,
        }
    }

    /// Play one game to the end.
    pub fn round(&mut self) -> Result<RoundResult> {
        let mut state = self.env.initialize(&mut self.rng);
        let mut moves = 0u32;

        while !state.is_final() {
            let player = state.player_to_move();
            let agent = match player {
                Player::One => &mut self.agent_a,
                Player::Two => &mut self.agent_b,
            };

            let action = agent
                .act(&state)
                .with_context(|| format!("{} agent ({}) failed to act", agent.name(), player))?;
            if !state.actions().contains(&action) {
                bail!(
                    "{} agent ({}) chose illegal action {:?}",
                    agent.name(),
                    player,
                    action
                );
            }

            debug!(%player, agent = agent.name(), ?action, "Move played");
            state = state.step(&action);
            moves += 1;
        }

        Ok(RoundResult {
            winner: state.winner(),
            moves,
        })
    }

    /// Play `rounds` games, reporting each finished round to `on_round`.
    pub fn run(
        &mut self,
        rounds: u32,
        mut on_round: impl FnMut(u32, &RoundResult),
    ) -> Result<TournamentResult> {
        let mut result = TournamentResult::default();

        for i in 0..rounds {
            let round = self.round().with_context(|| format!("round {} failed", i))?;
            let (a, b) = round.scores();
            info!(round = i, win_a = a, win_b = b, moves = round.moves, "Round finished");
            result.record(&round);
            on_round(i, &round);
        }

        info!(
            rounds = result.rounds,
            wins_a = result.wins_a,
            wins_b = result.wins_b,
            draws = result.draws,
            "Tournament finished"
        );
        Ok(result)
    }
}
