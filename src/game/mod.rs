//! Pure board and rules engine.

pub mod bot;
pub mod rules;
mod types;

pub use types::{Board, IllegalMove, Outcome, Seat};
