//! Opponent move selection.
//!
//! The opponent is deliberately not strategic: [`RandomBot`] picks uniformly
//! among the empty cells. [`ScriptedBot`] replays a fixed sequence so games
//! can be reproduced exactly.

use rand::prelude::*;
use std::collections::VecDeque;
use tracing::trace;

/// Chooses the opponent's cell
pub trait OpponentPolicy {
    /// Pick one of `empty_cells`.
    ///
    /// The engine never calls this with an empty slice. Returning an index
    /// outside the slice makes the engine reject the move.
    fn choose_cell(&mut self, empty_cells: &[usize]) -> usize;
}

impl<P: OpponentPolicy + ?Sized> OpponentPolicy for Box<P> {
    fn choose_cell(&mut self, empty_cells: &[usize]) -> usize {
        (**self).choose_cell(empty_cells)
    }
}

/// Uniformly random opponent
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible opponent
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentPolicy for RandomBot {
    fn choose_cell(&mut self, empty_cells: &[usize]) -> usize {
        let choice = empty_cells[self.rng.gen_range(0..empty_cells.len())];
        trace!(choice, candidates = empty_cells.len(), "random bot chose cell");
        choice
    }
}

/// Replays preferred cells in order.
///
/// Preferences that are already taken are skipped. Once the script runs out
/// the lowest empty cell is used.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBot {
    script: VecDeque<usize>,
}

impl ScriptedBot {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl OpponentPolicy for ScriptedBot {
    fn choose_cell(&mut self, empty_cells: &[usize]) -> usize {
        while let Some(next) = self.script.pop_front() {
            if empty_cells.contains(&next) {
                trace!(choice = next, "scripted bot chose cell");
                return next;
            }
        }
        empty_cells[0]
    }
}
