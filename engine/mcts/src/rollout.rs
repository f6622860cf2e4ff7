//! Default policy: uniform random playouts to a terminal state.

use engine_core::State;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

/// Play uniformly random legal actions from `state` until a terminal state.
///
/// Terminates for every game satisfying the finite-playout contract of
/// [`State`]. Returns `state` itself when it is already terminal.
pub fn rollout<S: State>(state: &S, rng: &mut ChaCha20Rng) -> S {
    rollout_with_depth(state, rng).0
}

/// Like [`rollout`], but also returns the number of moves played.
pub fn rollout_with_depth<S: State>(state: &S, rng: &mut ChaCha20Rng) -> (S, u32) {
    let mut current = state.clone();
    let mut depth = 0;
    loop {
        let actions = current.actions();
        match actions.choose(rng) {
            Some(action) => {
                current = current.step(action);
                depth += 1;
            }
            None => return (current, depth),
        }
    }
}
