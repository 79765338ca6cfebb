//! Engine actions and the events they produce.

use crate::game::Outcome;
use crate::player::{Mark, Turn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one opponent turn.
///
/// Issued when the engine starts waiting on the opponent. A ticket from before
/// a restart, or from an earlier move, no longer matches and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnTicket {
    /// Restart counter at issue time
    pub epoch: u64,
    /// Marks on the board at issue time
    pub ply: u8,
}

impl fmt::Display for TurnTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.epoch, self.ply)
    }
}

/// Everything the engine can be asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Human places a mark
    PlaceMark(usize),
    /// Think delay for this turn has elapsed
    BeginOpponentTurn(TurnTicket),
    /// Opponent picks and places its mark
    ResolveOpponentMove(TurnTicket),
    /// Start over with an empty board
    Restart,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A mark was placed
    MarkPlaced { mark: Mark, index: usize },

    /// The opponent is now thinking; schedule the think delay for this ticket
    OpponentThinking { ticket: TurnTicket },

    /// The think delay elapsed and the opponent move can be resolved
    OpponentReady { ticket: TurnTicket },

    /// The turn passed to the other side
    TurnChanged { turn: Turn },

    /// The game ended
    GameFinished {
        outcome: Outcome,
        /// Completed line, absent for a draw
        line: Option<[usize; 3]>,
    },

    /// The board was cleared
    GameRestarted { epoch: u64 },
}
