//! Core game state machine.
//!
//! This module contains the `GameEngine`, which owns the single mutable
//! `GameSession` and drives it through the four phases of a game.
//!
//! The opponent's think delay is not timed here. When the player's move leaves
//! the game open the engine reports [`GameEvent::OpponentThinking`] with a
//! [`TurnTicket`]; the caller waits however it likes and then hands the ticket
//! back through [`GameEngine::begin_opponent_turn`] and
//! [`GameEngine::resolve_opponent_move`]. A restart in between makes the
//! ticket stale, so a late opponent move never lands on the new board.

use crate::actions::{GameAction, GameEvent, TurnTicket};
use crate::board::{Board, BoardStatus, Cell, CELL_COUNT};
use crate::bot::{OpponentPolicy, RandomBot};
use crate::player::{Mark, Turn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Pause before the opponent moves
pub const THINK_DELAY: Duration = Duration::from_millis(1500);

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWins,
    OpponentWins,
    Draw,
}

impl Outcome {
    /// The outcome a board status implies, `None` while in progress
    pub fn from_status(status: BoardStatus) -> Option<Self> {
        match status {
            BoardStatus::InProgress => None,
            BoardStatus::PlayerWins => Some(Outcome::PlayerWins),
            BoardStatus::OpponentWins => Some(Outcome::OpponentWins),
            BoardStatus::Draw => Some(Outcome::Draw),
        }
    }

    /// The winning side, if any
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::PlayerWins => Some(Mark::Player),
            Outcome::OpponentWins => Some(Mark::Opponent),
            Outcome::Draw => None,
        }
    }
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the human to pick a cell
    AwaitingPlayerMove,

    /// Opponent's think delay is running
    OpponentThinking,

    /// Think delay over, opponent move not yet placed
    AwaitingOpponentMove,

    /// Game is over
    GameOver { outcome: Outcome },
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    #[error("cell {0} does not exist")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("not the player's turn")]
    NotPlayersTurn,

    #[error("not the opponent's turn")]
    NotOpponentsTurn,

    #[error("game is over")]
    GameOver,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Cell index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error("Illegal move: {0}")]
    IllegalMove(IllegalMove),

    #[error("Turn {ticket} was superseded")]
    StaleTicket { ticket: TurnTicket },
}

impl GameError {
    /// Board bound failures surface as illegal moves at the engine level
    fn into_illegal_move(self) -> Self {
        match self {
            GameError::IndexOutOfRange(index) => {
                GameError::IllegalMove(IllegalMove::OutOfRange(index))
            }
            other => other,
        }
    }
}

/// The complete mutable state of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// The game board
    pub board: Board,
    /// Who moves next
    pub turn: Turn,
    /// Set once the game is decided
    pub outcome: Option<Outcome>,
    /// Current phase
    pub phase: GamePhase,
    /// Number of restarts so far
    pub epoch: u64,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Turn::PlayerTurn,
            outcome: None,
            phase: GamePhase::AwaitingPlayerMove,
            epoch: 0,
        }
    }

    /// Marks placed so far this game
    pub fn ply(&self) -> u8 {
        self.board.marks_placed() as u8
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only copy of the session for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cells: [Cell; CELL_COUNT],
    pub phase: GamePhase,
    pub turn: Turn,
    pub outcome: Option<Outcome>,
    /// True while the think delay is running
    pub opponent_thinking: bool,
    pub winning_line: Option<[usize; 3]>,
    pub ply: u8,
    pub epoch: u64,
}

/// Drives a game between the human and an opponent policy
pub struct GameEngine<P: OpponentPolicy = RandomBot> {
    session: GameSession,
    policy: P,
}

impl GameEngine<RandomBot> {
    /// Engine with a uniformly random opponent
    pub fn new() -> Self {
        Self::with_policy(RandomBot::new())
    }

    /// Engine whose opponent plays a reproducible random sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_policy(RandomBot::with_seed(seed))
    }
}

impl Default for GameEngine<RandomBot> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OpponentPolicy> GameEngine<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            session: GameSession::new(),
            policy,
        }
    }

    pub fn board(&self) -> &Board {
        &self.session.board
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn turn(&self) -> Turn {
        self.session.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.session.outcome
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.session.phase, GamePhase::GameOver { .. })
    }

    /// Whether the think delay is running
    pub fn is_opponent_thinking(&self) -> bool {
        matches!(self.session.phase, GamePhase::OpponentThinking)
    }

    /// Cells the human may pick right now
    pub fn valid_moves(&self) -> Vec<usize> {
        match self.session.phase {
            GamePhase::AwaitingPlayerMove => self.session.board.empty_cells(),
            _ => Vec::new(),
        }
    }

    /// Ticket of the opponent turn in progress, if any
    pub fn pending_ticket(&self) -> Option<TurnTicket> {
        match self.session.phase {
            GamePhase::OpponentThinking | GamePhase::AwaitingOpponentMove => {
                Some(self.current_ticket())
            }
            _ => None,
        }
    }

    /// Immutable copy of the current state
    pub fn snapshot(&self) -> GameSnapshot {
        let board = &self.session.board;
        GameSnapshot {
            cells: board.cells(),
            phase: self.session.phase,
            turn: self.session.turn,
            outcome: self.session.outcome,
            opponent_thinking: self.is_opponent_thinking(),
            winning_line: board.winning_line().map(|(_, line)| line),
            ply: self.session.ply(),
            epoch: self.session.epoch,
        }
    }

    /// Apply an action to the game state
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::PlaceMark(index) => self.submit_player_move(index),
            GameAction::BeginOpponentTurn(ticket) => self.begin_opponent_turn(ticket),
            GameAction::ResolveOpponentMove(ticket) => self.resolve_opponent_move(ticket),
            GameAction::Restart => Ok(self.restart()),
        }
    }

    /// Place the human's mark
    pub fn submit_player_move(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        match self.session.phase {
            GamePhase::AwaitingPlayerMove => {}
            GamePhase::GameOver { .. } => {
                return Err(GameError::IllegalMove(IllegalMove::GameOver));
            }
            _ => return Err(GameError::IllegalMove(IllegalMove::NotPlayersTurn)),
        }

        self.session
            .board
            .place(index, Mark::Player)
            .map_err(GameError::into_illegal_move)?;
        debug!(index, "player placed mark");

        let mut events = vec![GameEvent::MarkPlaced {
            mark: Mark::Player,
            index,
        }];
        events.extend(self.finish_move(Mark::Player));
        Ok(events)
    }

    /// Leave the think delay for the given turn
    pub fn begin_opponent_turn(&mut self, ticket: TurnTicket) -> Result<Vec<GameEvent>, GameError> {
        self.check_ticket(ticket)?;
        match self.session.phase {
            GamePhase::OpponentThinking => {}
            GamePhase::GameOver { .. } => {
                return Err(GameError::IllegalMove(IllegalMove::GameOver));
            }
            _ => return Err(GameError::IllegalMove(IllegalMove::NotOpponentsTurn)),
        }

        self.session.phase = GamePhase::AwaitingOpponentMove;
        debug!(%ticket, "opponent ready to move");
        Ok(vec![GameEvent::OpponentReady { ticket }])
    }

    /// Let the opponent policy pick a cell and place it
    pub fn resolve_opponent_move(
        &mut self,
        ticket: TurnTicket,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.check_ticket(ticket)?;
        match self.session.phase {
            GamePhase::AwaitingOpponentMove => {}
            GamePhase::GameOver { .. } => {
                return Err(GameError::IllegalMove(IllegalMove::GameOver));
            }
            _ => return Err(GameError::IllegalMove(IllegalMove::NotOpponentsTurn)),
        }

        let empty = self.session.board.empty_cells();
        // A full board always evaluates as won or drawn
        assert!(
            !empty.is_empty(),
            "no legal move for the opponent on an undecided board"
        );

        let index = self.policy.choose_cell(&empty);
        self.session
            .board
            .place(index, Mark::Opponent)
            .map_err(GameError::into_illegal_move)?;
        debug!(index, %ticket, "opponent placed mark");

        let mut events = vec![GameEvent::MarkPlaced {
            mark: Mark::Opponent,
            index,
        }];
        events.extend(self.finish_move(Mark::Opponent));
        Ok(events)
    }

    /// Run both opponent transitions back to back.
    ///
    /// If the move is refused the think delay phase is restored, so a failed
    /// call leaves the session as it found it.
    pub fn complete_opponent_turn(
        &mut self,
        ticket: TurnTicket,
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut events = self.begin_opponent_turn(ticket)?;
        match self.resolve_opponent_move(ticket) {
            Ok(placed) => {
                events.extend(placed);
                Ok(events)
            }
            Err(e) => {
                self.session.phase = GamePhase::OpponentThinking;
                Err(e)
            }
        }
    }

    /// Clear the board and hand the first move back to the player.
    ///
    /// Any outstanding [`TurnTicket`] becomes stale.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let epoch = self.session.epoch + 1;
        self.session = GameSession {
            epoch,
            ..GameSession::new()
        };
        debug!(epoch, "game restarted");
        vec![GameEvent::GameRestarted { epoch }]
    }

    fn current_ticket(&self) -> TurnTicket {
        TurnTicket {
            epoch: self.session.epoch,
            ply: self.session.ply(),
        }
    }

    fn check_ticket(&self, ticket: TurnTicket) -> Result<(), GameError> {
        if ticket == self.current_ticket() {
            Ok(())
        } else {
            debug!(%ticket, current = %self.current_ticket(), "rejected stale ticket");
            Err(GameError::StaleTicket { ticket })
        }
    }

    /// Evaluate after `mark` was placed and move to the next phase
    fn finish_move(&mut self, mark: Mark) -> Vec<GameEvent> {
        let board = &self.session.board;
        let status = board.evaluate();

        if let Some(outcome) = Outcome::from_status(status) {
            let line = board.winning_line().map(|(_, line)| line);
            self.session.outcome = Some(outcome);
            self.session.phase = GamePhase::GameOver { outcome };
            debug!(?outcome, "game finished");
            return vec![GameEvent::GameFinished { outcome, line }];
        }

        self.session.turn = self.session.turn.next();
        let mut events = vec![GameEvent::TurnChanged {
            turn: self.session.turn,
        }];

        match mark {
            Mark::Player => {
                self.session.phase = GamePhase::OpponentThinking;
                events.push(GameEvent::OpponentThinking {
                    ticket: self.current_ticket(),
                });
            }
            Mark::Opponent => {
                self.session.phase = GamePhase::AwaitingPlayerMove;
            }
        }
        events
    }
}
