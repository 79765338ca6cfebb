//! Terminal input commands and output messages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tictactoe_core::{Board, GameSnapshot, Outcome};

use crate::session::Tally;

/// A line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Mark a cell, by index or `row,col`
    Place(usize),

    /// Start a new game
    Restart,

    /// Print the board again
    Show,

    /// Print usage
    Help,

    /// Leave
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Row {row}, column {col} is off the board")]
    OffBoard { row: usize, col: usize },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        match input.as_str() {
            "" | "b" | "board" => Ok(Command::Show),
            "r" | "restart" => Ok(Command::Restart),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => parse_cell(other)
                .unwrap_or_else(|| Err(ParseCommandError::Unknown(s.trim().to_string()))),
        }
    }
}

/// `None` when the input does not look like a cell at all
fn parse_cell(input: &str) -> Option<Result<Command, ParseCommandError>> {
    if let Some((row, col)) = input.split_once(',') {
        let row: usize = row.trim().parse().ok()?;
        let col: usize = col.trim().parse().ok()?;
        return Some(
            Board::index_of(row, col)
                .map(Command::Place)
                .ok_or(ParseCommandError::OffBoard { row, col }),
        );
    }
    input.parse().ok().map(|index| Ok(Command::Place(index)))
}

/// Messages written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Update {
    /// First message of a session
    Welcome { think_ms: u64 },

    /// Full game state
    State { snapshot: GameSnapshot },

    /// The opponent's think delay started
    OpponentThinking,

    /// The opponent placed its mark
    OpponentMoved { index: usize },

    /// Game finished
    GameOver { outcome: Outcome, tally: Tally },

    /// Board cleared
    Restarted { epoch: u64 },

    /// Input was refused
    Rejected { reason: String },

    /// Usage requested
    Help,

    /// Session ending
    Goodbye,
}
