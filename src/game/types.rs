//! Core domain types for the board engine.

use derive_more::{Display, Error};

/// One of the two participant slots in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    /// The participant who opened the match (moves first).
    First,
    /// The participant who filled the open seat.
    Second,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Returns the seat's roster index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// Converts a roster index back to a seat.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::First),
            1 => Some(Seat::Second),
            _ => None,
        }
    }
}

/// A rejected placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum IllegalMove {
    /// Cell index outside the 9-cell grid.
    #[display("cell index out of range")]
    OutOfRange,
    /// Target cell already holds a mark.
    #[display("cell is already occupied")]
    Occupied,
}

/// 3x3 grid of cells in row-major order.
///
/// Cells hold the seat that claimed them; marker symbols are a roster-level
/// attribute mapped in when a snapshot is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Seat>; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the seat occupying `index`, if any.
    pub fn cell(&self, index: usize) -> Option<Seat> {
        self.cells.get(index).copied().flatten()
    }

    /// Checks that `index` is in range and unoccupied.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Claims a cell for `seat`.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] if `index` is out of range or the cell is
    /// occupied. The board is untouched on failure.
    pub fn place(&mut self, index: usize, seat: Seat) -> Result<(), IllegalMove> {
        match self.cells.get_mut(index) {
            None => Err(IllegalMove::OutOfRange),
            Some(Some(_)) => Err(IllegalMove::Occupied),
            Some(slot) => {
                *slot = Some(seat);
                Ok(())
            }
        }
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells = [None; 9];
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Option<Seat>; 9] {
        &self.cells
    }

    /// Iterates over the indices of unoccupied cells.
    pub fn open_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based index, occupied cells show X or O for
    /// the first and second seat respectively.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    None => (index + 1).to_string(),
                    Some(Seat::First) => "X".to_string(),
                    Some(Seat::Second) => "O".to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Terminal classification of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Round is ongoing.
    InProgress,
    /// Round ended with a winner.
    Won(Seat),
    /// Round ended with a full board and no winner.
    Draw,
}

impl Outcome {
    /// Whether the round has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}
