//! Game session management.
//!
//! A `Session` turns user commands and timer expiries into engine calls and
//! the updates to show for them. It does no I/O and owns no timers: the
//! returned [`Reaction`] tells the runner when to start or cancel the think
//! delay.

use serde::{Deserialize, Serialize};
use tictactoe_core::{
    GameEngine, GameError, GameEvent, Mark, OpponentPolicy, Outcome, RandomBot, TurnTicket,
};
use tracing::{debug, info, warn};

use crate::protocol::{Command, Update};

/// Results of the games finished in this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub draws: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWins => self.player_wins += 1,
            Outcome::OpponentWins => self.opponent_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.player_wins + self.opponent_wins + self.draws
    }
}

/// What the runner should do after a command or timer
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Messages to print, in order
    pub updates: Vec<Update>,
    /// Start the think delay for this ticket
    pub schedule: Option<TurnTicket>,
    /// Abort any running think delay
    pub cancel_pending: bool,
    /// End the session
    pub quit: bool,
}

impl Reaction {
    fn with_updates(updates: Vec<Update>) -> Self {
        Self {
            updates,
            ..Self::default()
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::with_updates(vec![Update::Rejected {
            reason: reason.into(),
        }])
    }
}

/// One player's session, spanning any number of games.
pub struct Session<P: OpponentPolicy = RandomBot> {
    engine: GameEngine<P>,
    tally: Tally,
}

impl<P: OpponentPolicy> Session<P> {
    pub fn new(engine: GameEngine<P>) -> Self {
        Self {
            engine,
            tally: Tally::default(),
        }
    }

    pub fn engine(&self) -> &GameEngine<P> {
        &self.engine
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Messages for a newly attached user
    pub fn greeting(&self, think_ms: u64) -> Vec<Update> {
        vec![
            Update::Welcome { think_ms },
            Update::State {
                snapshot: self.engine.snapshot(),
            },
        ]
    }

    pub fn handle_command(&mut self, command: Command) -> Reaction {
        match command {
            Command::Place(index) => match self.engine.submit_player_move(index) {
                Ok(events) => self.react_to(events),
                Err(e) => {
                    warn!(index, error = %e, "move rejected");
                    Reaction::rejected(e.to_string())
                }
            },

            Command::Restart => {
                let mut updates: Vec<Update> = self
                    .engine
                    .restart()
                    .into_iter()
                    .filter_map(|event| match event {
                        GameEvent::GameRestarted { epoch } => {
                            info!(epoch, "new game");
                            Some(Update::Restarted { epoch })
                        }
                        _ => None,
                    })
                    .collect();
                updates.push(Update::State {
                    snapshot: self.engine.snapshot(),
                });
                Reaction {
                    updates,
                    cancel_pending: true,
                    ..Reaction::default()
                }
            }

            Command::Show => Reaction::with_updates(vec![Update::State {
                snapshot: self.engine.snapshot(),
            }]),

            Command::Help => Reaction::with_updates(vec![Update::Help]),

            Command::Quit => {
                info!(games = self.tally.games(), "player left");
                Reaction {
                    updates: vec![Update::Goodbye],
                    quit: true,
                    ..Reaction::default()
                }
            }
        }
    }

    /// The think delay for `ticket` elapsed.
    ///
    /// A ticket from before a restart is dropped without touching the board.
    /// A move the engine refuses is reported and leaves the game waiting for
    /// a restart.
    pub fn handle_think_elapsed(&mut self, ticket: TurnTicket) -> Reaction {
        match self.engine.complete_opponent_turn(ticket) {
            Ok(events) => self.react_to(events),
            Err(GameError::StaleTicket { .. }) => {
                debug!(%ticket, "discarding opponent move for a superseded turn");
                Reaction::default()
            }
            Err(e) => {
                warn!(%ticket, error = %e, "opponent move refused");
                Reaction::rejected(format!(
                    "AI could not move ({}). Type 'restart' for a new game.",
                    e
                ))
            }
        }
    }

    fn react_to(&mut self, events: Vec<GameEvent>) -> Reaction {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut schedule = None;

        for event in events {
            match event {
                GameEvent::MarkPlaced {
                    mark: Mark::Opponent,
                    index,
                } => before.push(Update::OpponentMoved { index }),
                GameEvent::OpponentThinking { ticket } => {
                    schedule = Some(ticket);
                    after.push(Update::OpponentThinking);
                }
                GameEvent::GameFinished { outcome, .. } => {
                    self.tally.record(outcome);
                    info!(?outcome, games = self.tally.games(), "game over");
                    after.push(Update::GameOver {
                        outcome,
                        tally: self.tally,
                    });
                }
                _ => {}
            }
        }

        let mut updates = before;
        updates.push(Update::State {
            snapshot: self.engine.snapshot(),
        });
        updates.extend(after);

        Reaction {
            updates,
            schedule,
            ..Reaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_core::{GamePhase, IllegalMove, ScriptedBot};

    fn session(script: &[usize]) -> Session<ScriptedBot> {
        Session::new(GameEngine::with_policy(ScriptedBot::new(
            script.iter().copied(),
        )))
    }

    fn kinds(reaction: &Reaction) -> Vec<&'static str> {
        reaction
            .updates
            .iter()
            .map(|u| match u {
                Update::Welcome { .. } => "welcome",
                Update::State { .. } => "state",
                Update::OpponentThinking => "thinking",
                Update::OpponentMoved { .. } => "moved",
                Update::GameOver { .. } => "over",
                Update::Restarted { .. } => "restarted",
                Update::Rejected { .. } => "rejected",
                Update::Help => "help",
                Update::Goodbye => "goodbye",
            })
            .collect()
    }

    #[test]
    fn test_player_move_schedules_think_delay() {
        let mut session = session(&[0]);
        let reaction = session.handle_command(Command::Place(4));

        assert_eq!(kinds(&reaction), vec!["state", "thinking"]);
        assert_eq!(reaction.schedule, Some(TurnTicket { epoch: 0, ply: 1 }));
        assert!(!reaction.cancel_pending);
    }

    #[test]
    fn test_think_elapsed_places_opponent_mark() {
        let mut session = session(&[0]);
        let ticket = session.handle_command(Command::Place(4)).schedule.unwrap();

        let reaction = session.handle_think_elapsed(ticket);
        assert_eq!(kinds(&reaction), vec!["moved", "state"]);
        assert_eq!(reaction.updates[0], Update::OpponentMoved { index: 0 });
        assert_eq!(reaction.schedule, None);
        assert_eq!(session.engine().phase(), GamePhase::AwaitingPlayerMove);
    }

    #[test]
    fn test_input_during_think_delay_is_rejected() {
        let mut session = session(&[0]);
        session.handle_command(Command::Place(4));

        let reaction = session.handle_command(Command::Place(5));
        assert_eq!(
            reaction.updates,
            vec![Update::Rejected {
                reason: GameError::IllegalMove(IllegalMove::NotPlayersTurn).to_string()
            }]
        );
        assert_eq!(reaction.schedule, None);
        assert_eq!(session.engine().board().marks_placed(), 1);
    }

    #[test]
    fn test_restart_drops_pending_opponent_move() {
        let mut session = session(&[0]);
        let stale = session.handle_command(Command::Place(4)).schedule.unwrap();

        let reaction = session.handle_command(Command::Restart);
        assert!(reaction.cancel_pending);
        assert_eq!(kinds(&reaction), vec!["restarted", "state"]);

        let reaction = session.handle_think_elapsed(stale);
        assert_eq!(reaction, Reaction::default());
        assert_eq!(session.engine().board().marks_placed(), 0);
        assert_eq!(session.engine().phase(), GamePhase::AwaitingPlayerMove);
    }

    #[test]
    fn test_refused_opponent_move_keeps_session_alive() {
        struct Stubborn;
        impl OpponentPolicy for Stubborn {
            fn choose_cell(&mut self, _empty_cells: &[usize]) -> usize {
                4
            }
        }

        let mut session = Session::new(GameEngine::with_policy(Stubborn));
        let ticket = session.handle_command(Command::Place(4)).schedule.unwrap();

        let reaction = session.handle_think_elapsed(ticket);
        assert_eq!(kinds(&reaction), vec!["rejected"]);
        assert_eq!(reaction.schedule, None);
        assert!(!reaction.quit);
        assert_eq!(session.engine().phase(), GamePhase::OpponentThinking);
        assert_eq!(session.engine().board().marks_placed(), 1);

        let reaction = session.handle_command(Command::Restart);
        assert_eq!(kinds(&reaction), vec!["restarted", "state"]);
        assert_eq!(reaction.updates[0], Update::Restarted { epoch: 1 });
        assert_eq!(session.engine().phase(), GamePhase::AwaitingPlayerMove);
    }

    #[test]
    fn test_finished_games_are_tallied() {
        let mut session = session(&[3, 5]);
        for cell in [0, 1] {
            let ticket = session.handle_command(Command::Place(cell)).schedule.unwrap();
            session.handle_think_elapsed(ticket);
        }

        let reaction = session.handle_command(Command::Place(2));
        assert_eq!(kinds(&reaction), vec!["state", "over"]);
        assert_eq!(
            reaction.updates[1],
            Update::GameOver {
                outcome: Outcome::PlayerWins,
                tally: Tally {
                    player_wins: 1,
                    opponent_wins: 0,
                    draws: 0
                }
            }
        );

        // Tally survives a restart
        session.handle_command(Command::Restart);
        assert_eq!(session.tally().games(), 1);
    }

    #[test]
    fn test_quit_and_help() {
        let mut session = session(&[]);
        let reaction = session.handle_command(Command::Quit);
        assert!(reaction.quit);
        assert_eq!(kinds(&reaction), vec!["goodbye"]);

        let reaction = session.handle_command(Command::Help);
        assert_eq!(kinds(&reaction), vec!["help"]);
    }
}
