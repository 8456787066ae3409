//! Per-match state: roster, board, turn, outcome and move log.

use crate::game::{Board, Outcome, Seat, rules};
use crate::protocol::{
    ConnectionId, EndReason, MatchId, MoveRecord, ParticipantInfo, ServerEvent, StateSnapshot,
};
use crate::timer::TimerHandle;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

/// Markers tried, in order, when a join collides with seat 0's marker.
pub const FALLBACK_MARKERS: [&str; 7] = ["❌", "⭕", "🐱", "🐶", "🐸", "🌟", "🍎"];

/// Marker of last resort when the fallback list is exhausted.
pub const DEFAULT_MARKER: &str = "⭕";

/// A connected player inside one match.
#[derive(Debug)]
pub struct Participant {
    /// Connection the participant joined from.
    pub conn: ConnectionId,
    /// Display name, used as the leaderboard key.
    pub name: String,
    /// Marker symbol, unique within the match.
    pub marker: String,
    /// Outbound event queue for the participant's connection.
    pub tx: UnboundedSender<ServerEvent>,
}

impl Participant {
    /// Queues an event for this participant's connection.
    ///
    /// A failed send means the socket is already gone; the disconnect path
    /// tears the match down, so the error carries no information here.
    pub fn send(&self, event: ServerEvent) {
        let _ = self.tx.send(event);
    }

    /// Returns the roster view of this participant.
    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            name: self.name.clone(),
            marker: self.marker.clone(),
        }
    }
}

/// Authoritative record of one match.
///
/// All mutation happens inside the coordinator, under its lock; the record
/// itself is plain data plus the pending countdown handle.
#[derive(Debug)]
pub struct Match {
    /// Identifier, unique per pairing.
    pub id: MatchId,
    /// The grid.
    pub board: Board,
    /// Zero, one or two participants, in seat order.
    pub participants: Vec<Participant>,
    /// Seat expected to move next.
    pub turn: Seat,
    /// Round classification.
    pub outcome: Outcome,
    /// Every accepted move of the round, in order.
    pub move_log: Vec<MoveRecord>,
    /// Pending turn countdown, if one is running.
    pub timer: Option<TimerHandle>,
    /// When the current round began.
    pub round_started_at: DateTime<Utc>,
}

impl Match {
    /// Creates an empty match awaiting its first participant.
    pub fn new(id: MatchId) -> Self {
        Self {
            id,
            board: Board::new(),
            participants: Vec::new(),
            turn: Seat::First,
            outcome: Outcome::InProgress,
            move_log: Vec::new(),
            timer: None,
            round_started_at: Utc::now(),
        }
    }

    /// Whether a second participant can still join.
    pub fn has_open_seat(&self) -> bool {
        self.participants.len() < 2
    }

    /// Returns the participant in `seat`, if that seat is filled.
    pub fn participant(&self, seat: Seat) -> Option<&Participant> {
        self.participants.get(seat.index())
    }

    /// Returns the seat occupied by `conn`, if it is in this match.
    pub fn seat_of(&self, conn: ConnectionId) -> Option<Seat> {
        self.participants
            .iter()
            .position(|participant| participant.conn == conn)
            .and_then(Seat::from_index)
    }

    /// Returns the roster in seat order.
    pub fn roster(&self) -> Vec<ParticipantInfo> {
        self.participants.iter().map(Participant::info).collect()
    }

    /// Queues an event for every participant.
    pub fn broadcast(&self, event: ServerEvent) {
        for participant in &self.participants {
            participant.send(event.clone());
        }
    }

    /// Revokes any pending countdown. At most one timer exists per match.
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Clears the round in place: board, log, outcome and turn return to
    /// their initial values, any pending countdown is revoked and a fresh
    /// round timestamp is recorded. The roster is untouched.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.board.clear();
        self.turn = Seat::First;
        self.outcome = Outcome::InProgress;
        self.move_log.clear();
        self.round_started_at = Utc::now();
    }

    /// Maps the grid to the markers of the seats occupying each cell.
    pub fn grid_markers(&self) -> [Option<String>; 9] {
        self.board.cells().map(|cell| {
            cell.and_then(|seat| {
                self.participant(seat)
                    .map(|participant| participant.marker.clone())
            })
        })
    }

    /// Builds the broadcast snapshot of the match.
    ///
    /// `turn` is the roster index to advertise, which the coordinator flips
    /// independently of the stored turn. The winning line is recomputed from
    /// the board, so a timeout win carries none.
    pub fn snapshot(
        &self,
        turn: usize,
        timer_seconds: u64,
        reason: Option<EndReason>,
    ) -> StateSnapshot {
        let winner = match self.outcome {
            Outcome::Won(seat) => self
                .participant(seat)
                .map(|participant| participant.name.clone()),
            _ => None,
        };
        StateSnapshot {
            grid: self.grid_markers(),
            turn,
            winner,
            draw: self.outcome == Outcome::Draw,
            winning_line: rules::detect_win(&self.board).map(|win| win.line),
            move_log: self.move_log.clone(),
            roster: self.roster(),
            timer_seconds,
            reason,
        }
    }
}
