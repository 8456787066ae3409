//! Win detection.

use crate::game::types::{Board, Seat};
use tracing::instrument;

/// A completed three-in-a-row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win {
    /// The seat holding all three cells.
    pub seat: Seat,
    /// Cell indices of the line, in scan order.
    pub line: [usize; 3],
}

/// The eight candidate lines: rows, then columns, then diagonals.
///
/// Scan order is fixed so the reported line is deterministic when a single
/// move happens to complete more than one.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the first completed line on the board, if any.
#[instrument]
pub fn detect_win(board: &Board) -> Option<Win> {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(seat) = board.cell(a) {
            if board.cell(b) == Some(seat) && board.cell(c) == Some(seat) {
                return Some(Win { seat, line });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(detect_win(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        for index in [0, 1, 2] {
            board.place(index, Seat::First).unwrap();
        }
        let win = detect_win(&board).unwrap();
        assert_eq!(win.seat, Seat::First);
        assert_eq!(win.line, [0, 1, 2]);
    }

    #[test]
    fn test_winner_column() {
        let mut board = Board::new();
        for index in [1, 4, 7] {
            board.place(index, Seat::Second).unwrap();
        }
        let win = detect_win(&board).unwrap();
        assert_eq!(win.seat, Seat::Second);
        assert_eq!(win.line, [1, 4, 7]);
    }

    #[test]
    fn test_winner_diagonal() {
        let mut board = Board::new();
        for index in [2, 4, 6] {
            board.place(index, Seat::First).unwrap();
        }
        assert_eq!(detect_win(&board).unwrap().line, [2, 4, 6]);
    }

    #[test]
    fn test_no_winner_incomplete() {
        let mut board = Board::new();
        board.place(0, Seat::First).unwrap();
        board.place(1, Seat::First).unwrap();
        assert_eq!(detect_win(&board), None);
    }

    #[test]
    fn test_scan_order_prefers_rows_over_diagonals() {
        // Bottom row and the 0-4-8 diagonal complete at once; the row wins.
        let mut board = Board::new();
        for index in [0, 4, 6, 7, 8] {
            board.place(index, Seat::First).unwrap();
        }
        assert_eq!(detect_win(&board).unwrap().line, [6, 7, 8]);
    }
}
