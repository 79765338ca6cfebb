//! Tic-tac-toe rules engine: one human player against a random opponent.
//!
//! This crate provides the core game logic, including:
//! - Board representation with move legality and win/draw detection
//! - The opponent's move-selection policy
//! - The turn state machine with snapshots for presentation
//!
//! # Architecture
//!
//! The engine holds no timers and no UI state. Front ends (the terminal
//! driver, or a browser through the `wasm` feature) call into it, wait out the
//! opponent's think delay themselves, and render [`GameSnapshot`]s.
//!
//! # Modules
//!
//! - [`board`]: The 3x3 grid and terminal evaluation
//! - [`player`]: Marks and turns
//! - [`bot`]: Opponent policies
//! - [`actions`]: Engine actions and events
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod bot;
pub mod game;
pub mod player;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent, TurnTicket};
pub use board::{Board, BoardStatus, Cell, CELL_COUNT, WINNING_LINES};
pub use bot::{OpponentPolicy, RandomBot, ScriptedBot};
pub use game::{
    GameEngine, GameError, GamePhase, GameSession, GameSnapshot, IllegalMove, Outcome, THINK_DELAY,
};
pub use player::{Mark, Turn};
