//! The two sides of the game.
//!
//! This module contains:
//! - `Mark`, the symbol a side leaves in a cell
//! - `Turn`, which side is expected to move next

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mark occupying a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Placed by the human player
    Player,
    /// Placed by the computer opponent
    Opponent,
}

impl Mark {
    /// Both marks, player first
    pub const ALL: [Mark; 2] = [Mark::Player, Mark::Opponent];

    /// Glyph used when rendering the board
    pub fn symbol(&self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Which side holds the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    PlayerTurn,
    OpponentTurn,
}

impl Turn {
    /// The mark placed by whoever holds this turn
    pub fn mark(&self) -> Mark {
        match self {
            Turn::PlayerTurn => Mark::Player,
            Turn::OpponentTurn => Mark::Opponent,
        }
    }

    /// The turn after this one
    pub fn next(&self) -> Turn {
        match self {
            Turn::PlayerTurn => Turn::OpponentTurn,
            Turn::OpponentTurn => Turn::PlayerTurn,
        }
    }
}

impl Default for Turn {
    fn default() -> Self {
        Turn::PlayerTurn
    }
}
