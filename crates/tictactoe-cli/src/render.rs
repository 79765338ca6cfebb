//! Plain-text rendering of updates.

use tictactoe_core::{Cell, GamePhase, GameSnapshot, Mark, Outcome, CELL_COUNT};

use crate::protocol::Update;

const HELP: &str = "Enter a cell as 0-8 or row,col (0-2 each). \
Commands: restart (r), board (b), help (h), quit (q).";

/// Grid with X and O, empty cells show their index
pub fn render_board(cells: &[Cell; CELL_COUNT]) -> String {
    let mut out = String::new();
    for (row, chunk) in cells.chunks(3).enumerate() {
        if row > 0 {
            out.push_str("---+---+---\n");
        }
        let line: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(col, cell)| match cell.mark() {
                Some(mark) => format!(" {} ", mark.symbol()),
                None => format!(" {} ", row * 3 + col),
            })
            .collect();
        out.push_str(&line.join("|"));
        out.push('\n');
    }
    out
}

fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome.winner() {
        Some(Mark::Player) => "Player wins",
        Some(Mark::Opponent) => "AI wins",
        None => "Draw",
    }
}

fn render_snapshot(snapshot: &GameSnapshot) -> String {
    let mut out = render_board(&snapshot.cells);
    if snapshot.phase == GamePhase::AwaitingPlayerMove {
        out.push_str(&format!("Your move ({}).", snapshot.turn.mark()));
    }
    out.trim_end().to_string()
}

pub fn render_update(update: &Update) -> String {
    match update {
        Update::Welcome { think_ms } => format!(
            "Tic Tac Toe. You are X, the AI is O and takes {:.1}s to think.\n{}",
            *think_ms as f64 / 1000.0,
            HELP
        ),
        Update::State { snapshot } => render_snapshot(snapshot),
        Update::OpponentThinking => "AI is thinking...".to_string(),
        Update::OpponentMoved { index } => format!("AI took cell {}.", index),
        Update::GameOver { outcome, tally } => format!(
            "{}! Record: {} won, {} lost, {} drawn. Type 'restart' to play again.",
            outcome_text(*outcome),
            tally.player_wins,
            tally.opponent_wins,
            tally.draws
        ),
        Update::Restarted { .. } => "New game.".to_string(),
        Update::Rejected { reason } => reason.clone(),
        Update::Help => HELP.to_string(),
        Update::Goodbye => "Bye.".to_string(),
    }
}
