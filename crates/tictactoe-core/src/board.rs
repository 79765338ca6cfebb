//! Game board representation.
//!
//! This module contains:
//! - Cell contents and the 3x3 row-major grid
//! - The winning line table
//! - Move application, legality checks and terminal evaluation
//!
//! The board knows nothing about turns or the opponent; the engine in
//! [`crate::game`] enforces those.

use crate::game::{GameError, IllegalMove};
use crate::player::Mark;
use serde::{Deserialize, Serialize};

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// Width of a row
pub const ROW_LEN: usize = 3;

/// Every row, column and diagonal, rows first
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Contents of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    PlayerMark,
    OpponentMark,
}

impl Cell {
    /// The mark in this cell, if any
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::PlayerMark => Some(Mark::Player),
            Cell::OpponentMark => Some(Mark::Opponent),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Player => Cell::PlayerMark,
            Mark::Opponent => Cell::OpponentMark,
        }
    }
}

/// Result of evaluating a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    InProgress,
    PlayerWins,
    OpponentWins,
    Draw,
}

/// The 3x3 grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit cell contents
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Convert a (row, col) pair to a cell index
    pub fn index_of(row: usize, col: usize) -> Option<usize> {
        if row < ROW_LEN && col < ROW_LEN {
            Some(row * ROW_LEN + col)
        } else {
            None
        }
    }

    fn check_index(index: usize) -> Result<(), GameError> {
        if index < CELL_COUNT {
            Ok(())
        } else {
            Err(GameError::IndexOutOfRange(index))
        }
    }

    /// Contents of a cell
    pub fn get(&self, index: usize) -> Result<Cell, GameError> {
        Self::check_index(index)?;
        Ok(self.cells[index])
    }

    /// Whether a cell is empty
    pub fn is_empty(&self, index: usize) -> Result<bool, GameError> {
        Ok(self.get(index)?.is_empty())
    }

    /// Put a mark in an empty cell. The board is untouched on failure.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), GameError> {
        if !self.is_empty(index)? {
            return Err(GameError::IllegalMove(IllegalMove::Occupied(index)));
        }
        self.cells[index] = Cell::from(mark);
        Ok(())
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
    }

    /// Copy of all cells in index order
    pub fn cells(&self) -> [Cell; CELL_COUNT] {
        self.cells
    }

    /// Indices of empty cells, ascending
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of marks placed
    pub fn marks_placed(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    fn completed_line(&self, mark: Mark) -> Option<[usize; 3]> {
        let target = Cell::from(mark);
        WINNING_LINES
            .iter()
            .find(|line| line.iter().all(|&i| self.cells[i] == target))
            .copied()
    }

    /// The line that decides the game, if any.
    ///
    /// Player lines take precedence over opponent lines, same as
    /// [`Board::evaluate`].
    pub fn winning_line(&self) -> Option<(Mark, [usize; 3])> {
        Mark::ALL
            .iter()
            .find_map(|&mark| self.completed_line(mark).map(|line| (mark, line)))
    }

    /// Evaluate the position.
    ///
    /// A completed player line beats a completed opponent line. That pair can
    /// only arise from a hand-built board.
    pub fn evaluate(&self) -> BoardStatus {
        match self.winning_line() {
            Some((Mark::Player, _)) => BoardStatus::PlayerWins,
            Some((Mark::Opponent, _)) => BoardStatus::OpponentWins,
            None if self.is_full() => BoardStatus::Draw,
            None => BoardStatus::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const E: Cell = Cell::Empty;
    const P: Cell = Cell::PlayerMark;
    const O: Cell = Cell::OpponentMark;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_cells(), (0..CELL_COUNT).collect::<Vec<_>>());
        assert_eq!(board.marks_placed(), 0);
        assert_eq!(board.evaluate(), BoardStatus::InProgress);
    }

    #[test]
    fn test_place_then_read_back() {
        for index in 0..CELL_COUNT {
            for mark in Mark::ALL {
                let mut board = Board::new();
                board.place(index, mark).unwrap();
                assert_eq!(board.get(index).unwrap(), Cell::from(mark));
                assert_eq!(board.get(index).unwrap().mark(), Some(mark));
                assert!(!board.is_empty(index).unwrap());
            }
        }
    }

    #[test]
    fn test_place_on_occupied_cell_fails() {
        let mut board = Board::new();
        board.place(4, Mark::Opponent).unwrap();
        let before = board;

        for mark in Mark::ALL {
            let err = board.place(4, mark).unwrap_err();
            assert_eq!(err, GameError::IllegalMove(IllegalMove::Occupied(4)));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut board = Board::new();
        assert_eq!(board.is_empty(9), Err(GameError::IndexOutOfRange(9)));
        assert_eq!(
            board.place(usize::MAX, Mark::Player),
            Err(GameError::IndexOutOfRange(usize::MAX))
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_every_line_wins_for_either_side() {
        for line in WINNING_LINES {
            for mark in Mark::ALL {
                let mut board = Board::new();
                for i in line {
                    board.place(i, mark).unwrap();
                }
                let expected = match mark {
                    Mark::Player => BoardStatus::PlayerWins,
                    Mark::Opponent => BoardStatus::OpponentWins,
                };
                assert_eq!(board.evaluate(), expected, "line {:?}", line);
                assert_eq!(board.winning_line(), Some((mark, line)));
            }
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X
        // X O O
        // O X X
        let board = Board::from_cells([P, O, P, P, O, O, O, P, P]);
        assert!(board.is_full());
        assert_eq!(board.winning_line(), None);
        assert_eq!(board.evaluate(), BoardStatus::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        // X O X
        // O X O
        // O X X
        let board = Board::from_cells([P, O, P, O, P, O, O, P, P]);
        assert!(board.is_full());
        assert_eq!(board.evaluate(), BoardStatus::PlayerWins);
    }

    #[test]
    fn test_player_line_takes_precedence() {
        let board = Board::from_cells([O, O, O, P, P, P, E, E, E]);
        assert_eq!(board.evaluate(), BoardStatus::PlayerWins);
        assert_eq!(board.winning_line(), Some((Mark::Player, [3, 4, 5])));
    }

    #[test]
    fn test_reset_clears_board() {
        let mut board = Board::from_cells([P, O, P, E, O, E, E, P, E]);
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_index_of() {
        assert_eq!(Board::index_of(0, 0), Some(0));
        assert_eq!(Board::index_of(1, 1), Some(4));
        assert_eq!(Board::index_of(2, 0), Some(6));
        assert_eq!(Board::index_of(3, 0), None);
    }
}
