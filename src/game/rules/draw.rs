//! Draw detection.

use super::win::detect_win;
use crate::game::types::Board;
use tracing::instrument;

/// Checks for a drawn board: every cell occupied and no completed line.
#[instrument]
pub fn detect_draw(board: &Board) -> bool {
    board.is_full() && detect_win(board).is_none()
}
