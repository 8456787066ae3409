//! Match pairing, move validation and broadcasting.

use crate::game::{Outcome, rules};
use crate::leaderboard::{Leaderboard, RoundResult};
use crate::protocol::{ClientEvent, ConnectionId, EndReason, MatchId, MoveRecord, ServerEvent};
use crate::session::{DEFAULT_MARKER, FALLBACK_MARKERS, Match, Participant};
use crate::timer::{TURN_SECONDS, TimerHandle};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

/// Live matches plus the connection-to-match index maintained at join time.
#[derive(Debug, Default)]
struct Registry {
    matches: HashMap<MatchId, Match>,
    memberships: HashMap<ConnectionId, MatchId>,
}

/// Pairs participants into matches and owns all match mutation.
///
/// Every handler runs to completion under one async lock, so no two events
/// interleave on the same match. Timer expiry re-enters through the same
/// lock; a legal move revokes the countdown while holding it, before any
/// state change, so a stale expiry can never land on an advanced match.
#[derive(Debug, Clone)]
pub struct Coordinator {
    registry: Arc<Mutex<Registry>>,
    leaderboard: Leaderboard,
}

impl Coordinator {
    /// Creates a coordinator recording results into `leaderboard`.
    pub fn new(leaderboard: Leaderboard) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            leaderboard,
        }
    }

    /// Returns the leaderboard this coordinator records into.
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Routes one decoded client event.
    ///
    /// `tx` is the connection's outbound queue; join keeps a clone of it in
    /// the participant record for later broadcasts.
    pub async fn handle(
        &self,
        conn: ConnectionId,
        tx: &UnboundedSender<ServerEvent>,
        event: ClientEvent,
    ) {
        match event {
            ClientEvent::Join { name, marker } => self.join(conn, name, marker, tx.clone()).await,
            ClientEvent::Move { match_id, cell } => self.make_move(conn, match_id, cell).await,
            ClientEvent::Restart { match_id } => self.restart(match_id).await,
            ClientEvent::Leaderboard => {
                let _ = tx.send(ServerEvent::LeaderboardSnapshot {
                    entries: self.leaderboard.snapshot(),
                });
            }
        }
    }

    /// Seats `conn` in the first open match, or opens a new one.
    ///
    /// A marker colliding with seat 0's is replaced by the first fallback
    /// that differs, and the joiner is told. Filling the second seat starts
    /// the round and its countdown.
    #[instrument(skip(self, tx))]
    pub async fn join(
        &self,
        conn: ConnectionId,
        name: String,
        marker: String,
        tx: UnboundedSender<ServerEvent>,
    ) {
        let mut registry = self.registry.lock().await;

        let open_id = registry
            .matches
            .values()
            .find(|game| game.has_open_seat())
            .map(|game| game.id);

        let (match_id, seat_index) = if let Some(id) = open_id {
            let Some(game) = registry.matches.get_mut(&id) else {
                return;
            };
            let taken = game
                .participants
                .first()
                .map(|seated| seated.marker.clone())
                .unwrap_or_default();
            let assigned = if marker == taken {
                let fallback = FALLBACK_MARKERS
                    .iter()
                    .copied()
                    .find(|candidate| *candidate != taken)
                    .unwrap_or(DEFAULT_MARKER)
                    .to_string();
                info!(conn, requested = %marker, assigned = %fallback, "marker collision resolved");
                let _ = tx.send(ServerEvent::MarkerReassigned {
                    marker: fallback.clone(),
                });
                fallback
            } else {
                marker
            };
            game.participants.push(Participant {
                conn,
                name,
                marker: assigned,
                tx,
            });
            (id, 1)
        } else {
            let mut game = Match::new(conn);
            game.participants.push(Participant {
                conn,
                name,
                marker,
                tx,
            });
            registry.matches.insert(game.id, game);
            (conn, 0)
        };
        registry.memberships.insert(conn, match_id);

        let Some(game) = registry.matches.get_mut(&match_id) else {
            return;
        };
        info!(conn, match_id, seat_index, "participant joined");

        if let Some(joiner) = game.participants.get(seat_index) {
            joiner.send(ServerEvent::Joined {
                match_id,
                seat: seat_index,
            });
        }
        game.broadcast(ServerEvent::RosterUpdated {
            roster: game.roster(),
        });

        if game.has_open_seat() {
            if let Some(joiner) = game.participants.get(seat_index) {
                joiner.send(ServerEvent::WaitingForOpponent);
            }
        } else {
            game.broadcast(ServerEvent::RoundStarted {
                turn: game.turn.index(),
            });
            self.start_timer(game);
        }
    }

    /// Applies a move if it is legal; anything else is silently ignored.
    ///
    /// Legal means: the match exists with a full roster, the round is not
    /// over, `conn` holds the seat on turn, and the cell is a free one.
    #[instrument(skip(self))]
    pub async fn make_move(&self, conn: ConnectionId, match_id: MatchId, cell: usize) {
        let mut registry = self.registry.lock().await;
        let Some(game) = registry.matches.get_mut(&match_id) else {
            debug!(match_id, "move for unknown match ignored");
            return;
        };
        if game.has_open_seat() || game.outcome.is_terminal() {
            debug!(match_id, "move outside an active round ignored");
            return;
        }
        let Some(active) = game.participant(game.turn) else {
            return;
        };
        if active.conn != conn {
            debug!(conn, match_id, "out-of-turn move ignored");
            return;
        }
        let mover_name = active.name.clone();
        if !game.board.is_empty(cell) {
            debug!(match_id, cell, "illegal cell ignored");
            return;
        }

        // The countdown must die before the board changes; a stale expiry
        // after this point would forfeit a round that already advanced.
        game.cancel_timer();

        let seat = game.turn;
        if game.board.place(cell, seat).is_err() {
            return;
        }
        game.move_log.push(MoveRecord {
            player_name: mover_name.clone(),
            index: cell,
        });

        if let Some(win) = rules::detect_win(&game.board) {
            game.outcome = Outcome::Won(win.seat);
            let loser_name = game
                .participant(seat.opponent())
                .map(|participant| participant.name.clone())
                .unwrap_or_default();
            self.leaderboard.record(&mover_name, RoundResult::Win);
            self.leaderboard.record(&loser_name, RoundResult::Loss);
            info!(match_id, winner = %mover_name, line = ?win.line, "round won");
        } else if rules::detect_draw(&game.board) {
            game.outcome = Outcome::Draw;
            for participant in &game.participants {
                self.leaderboard.record(&participant.name, RoundResult::Draw);
            }
            info!(match_id, "round drawn");
        }

        let next = game.turn.opponent();
        let snapshot = game.snapshot(next.index(), TURN_SECONDS, None);
        game.broadcast(ServerEvent::StateUpdated(snapshot));

        if !game.outcome.is_terminal() {
            game.turn = next;
            self.start_timer(game);
        }
    }

    /// Resets a match in place, forfeiting any round in progress.
    ///
    /// Accepted in any state; a forfeited round records no results.
    #[instrument(skip(self))]
    pub async fn restart(&self, match_id: MatchId) {
        let mut registry = self.registry.lock().await;
        let Some(game) = registry.matches.get_mut(&match_id) else {
            debug!(match_id, "restart for unknown match ignored");
            return;
        };

        game.reset();
        game.broadcast(ServerEvent::MatchReset {
            grid: game.grid_markers(),
            turn: game.turn.index(),
            roster: game.roster(),
            timer_seconds: TURN_SECONDS,
        });
        self.start_timer(game);
        info!(match_id, "match reset");
    }

    /// Tears down the match containing `conn`, if any.
    ///
    /// The remaining participant is told the opponent left; no results are
    /// recorded.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(match_id) = registry.memberships.remove(&conn) else {
            return;
        };
        let Some(game) = registry.matches.remove(&match_id) else {
            return;
        };
        for participant in game
            .participants
            .iter()
            .filter(|participant| participant.conn != conn)
        {
            participant.send(ServerEvent::OpponentLeft);
            registry.memberships.remove(&participant.conn);
        }
        info!(conn, match_id, "participant left, match dropped");
        // The match record drops here, revoking its countdown with it.
    }

    /// Arms the turn countdown for `game` and announces it.
    ///
    /// Replacing the handle revokes any previous countdown. A match without
    /// a full roster gets no countdown; expiry needs an opponent to credit.
    fn start_timer(&self, game: &mut Match) {
        if game.has_open_seat() {
            return;
        }
        game.broadcast(ServerEvent::TimerStarted {
            seconds: TURN_SECONDS,
        });
        let coordinator = self.clone();
        let match_id = game.id;
        game.timer = Some(TimerHandle::spawn(async move {
            coordinator.expire_timer(match_id).await;
        }));
    }

    /// Ends the round when the countdown runs out: the seat on turn loses.
    ///
    /// Reached only from the countdown task; the lock acquisition below is
    /// the abort point that makes cancellation final.
    #[instrument(skip(self))]
    async fn expire_timer(&self, match_id: MatchId) {
        let mut registry = self.registry.lock().await;
        let Some(game) = registry.matches.get_mut(&match_id) else {
            return;
        };
        if game.outcome.is_terminal() || game.has_open_seat() {
            return;
        }

        // The countdown already fired; clear the slot so no handle lingers.
        game.timer.take();

        let loser = game.turn;
        let winner = loser.opponent();
        game.outcome = Outcome::Won(winner);

        let winner_name = game
            .participant(winner)
            .map(|participant| participant.name.clone())
            .unwrap_or_default();
        let loser_name = game
            .participant(loser)
            .map(|participant| participant.name.clone())
            .unwrap_or_default();
        self.leaderboard.record(&winner_name, RoundResult::Win);
        self.leaderboard.record(&loser_name, RoundResult::Loss);
        info!(match_id, winner = %winner_name, "turn clock expired, round forfeited");

        let snapshot = game.snapshot(game.turn.index(), 0, Some(EndReason::Timeout));
        game.broadcast(ServerEvent::StateUpdated(snapshot));
    }
}
