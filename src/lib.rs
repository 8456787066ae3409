//! Gridduel library - real-time tic-tac-toe match coordination
//!
//! The crate pairs WebSocket clients into two-player matches, enforces turn
//! order and move legality, runs a 30-second turn clock with
//! timeout-as-loss semantics, and keeps a process-lifetime leaderboard.
//!
//! # Architecture
//!
//! - **Game**: pure board, win/draw rules and the scripted opponent
//! - **Session**: per-match state (roster, turn, outcome, move log)
//! - **Coordinator**: pairing, validation, broadcasts, timeout handling
//! - **Leaderboard**: cross-match win/loss/draw aggregation
//! - **Server**: axum WebSocket transport
//!
//! # Example
//!
//! ```no_run
//! use gridduel::{Coordinator, Leaderboard};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let coordinator = Coordinator::new(Leaderboard::new());
//! gridduel::serve("127.0.0.1", 3000, coordinator).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod coordinator;
mod game;
mod leaderboard;
mod protocol;
mod server;
mod session;
mod timer;

// Crate-level exports - Coordination
pub use coordinator::Coordinator;

// Crate-level exports - Game engine
pub use game::bot;
pub use game::rules::{Win, detect_draw, detect_win};
pub use game::{Board, IllegalMove, Outcome, Seat};

// Crate-level exports - Leaderboard
pub use leaderboard::{Leaderboard, RoundResult, Tally};

// Crate-level exports - Wire protocol
pub use protocol::{
    ClientEvent, ConnectionId, EndReason, MatchId, MoveRecord, ParticipantInfo, ServerEvent,
    StateSnapshot,
};

// Crate-level exports - Server
pub use server::{AppState, router, serve};

// Crate-level exports - Match state
pub use session::{DEFAULT_MARKER, FALLBACK_MARKERS, Match, Participant};

// Crate-level exports - Turn timer
pub use timer::{TURN_SECONDS, TimerHandle};
