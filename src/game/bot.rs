//! Scripted opponent for single-player games.
//!
//! Runs entirely in the caller's process; the match coordinator is not
//! involved.

use super::rules::detect_win;
use super::types::{Board, Seat};
use rand::seq::SliceRandom;

const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Picks the scripted opponent's next cell, or `None` on a full board.
///
/// Priority order: complete a line for `seat`, block the opponent's
/// completion, take the center, take a random free corner, take any random
/// free cell. The first three steps are deterministic.
pub fn choose_move(board: &Board, seat: Seat) -> Option<usize> {
    let open: Vec<usize> = board.open_cells().collect();
    if open.is_empty() {
        return None;
    }

    // Probe each open cell for an immediate win, ours before theirs.
    for candidate in [seat, seat.opponent()] {
        for &index in &open {
            let mut probe = *board;
            if probe.place(index, candidate).is_ok()
                && detect_win(&probe).map(|win| win.seat) == Some(candidate)
            {
                return Some(index);
            }
        }
    }

    if board.is_empty(CENTER) {
        return Some(CENTER);
    }

    let mut rng = rand::thread_rng();
    let open_corners: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|&corner| board.is_empty(corner))
        .collect();
    if let Some(&corner) = open_corners.choose(&mut rng) {
        return Some(corner);
    }

    open.choose(&mut rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_the_winning_cell() {
        let mut board = Board::new();
        board.place(0, Seat::Second).unwrap();
        board.place(1, Seat::Second).unwrap();
        board.place(3, Seat::First).unwrap();
        board.place(4, Seat::First).unwrap();
        // Completing 0-1-2 beats blocking 3-4-5.
        assert_eq!(choose_move(&board, Seat::Second), Some(2));
    }

    #[test]
    fn test_blocks_the_opponent() {
        let mut board = Board::new();
        board.place(0, Seat::First).unwrap();
        board.place(4, Seat::First).unwrap();
        board.place(1, Seat::Second).unwrap();
        // The human threatens 0-4-8.
        assert_eq!(choose_move(&board, Seat::Second), Some(8));
    }

    #[test]
    fn test_prefers_center_when_quiet() {
        let mut board = Board::new();
        board.place(0, Seat::First).unwrap();
        assert_eq!(choose_move(&board, Seat::Second), Some(CENTER));
    }

    #[test]
    fn test_falls_back_to_a_corner() {
        let mut board = Board::new();
        board.place(4, Seat::First).unwrap();
        let cell = choose_move(&board, Seat::Second).unwrap();
        assert!(CORNERS.contains(&cell));
    }

    #[test]
    fn test_full_board_yields_no_move() {
        let mut board = Board::new();
        for index in [0, 2, 4, 5, 7] {
            board.place(index, Seat::First).unwrap();
        }
        for index in [1, 3, 6, 8] {
            board.place(index, Seat::Second).unwrap();
        }
        assert_eq!(choose_move(&board, Seat::Second), None);
    }
}
