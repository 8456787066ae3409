//! Wire protocol between clients and the coordinator.
//!
//! Messages are internally tagged JSON; the transport layer decodes
//! [`ClientEvent`] frames and encodes [`ServerEvent`] frames, everything
//! else lives in the coordinator.

use crate::leaderboard::Tally;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of one match, unique per pairing.
pub type MatchId = u64;

/// Identifier of one client connection.
pub type ConnectionId = u64;

/// Roster entry shared with both participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    /// Display name.
    pub name: String,
    /// Marker symbol, unique within the match.
    pub marker: String,
}

/// One entry of the append-only move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// Display name of the mover.
    pub player_name: String,
    /// Claimed cell index.
    pub index: usize,
}

/// Why a terminal broadcast ended the round, when not by a normal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    /// The active participant let the turn clock run out.
    Timeout,
}

/// Messages a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter matchmaking with a display name and requested marker.
    Join {
        /// Display name, used as the leaderboard key.
        name: String,
        /// Requested marker symbol.
        marker: String,
    },
    /// Claim a cell in a match.
    #[serde(rename_all = "camelCase")]
    Move {
        /// Target match.
        match_id: MatchId,
        /// Cell index in 0..9.
        cell: usize,
    },
    /// Reset a match in place, forfeiting any round in progress.
    #[serde(rename_all = "camelCase")]
    Restart {
        /// Target match.
        match_id: MatchId,
    },
    /// Request the current leaderboard.
    Leaderboard,
}

/// Full match snapshot broadcast after every accepted move or timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// The grid as marker symbols, row-major.
    pub grid: [Option<String>; 9],
    /// Roster index of the participant expected to move next.
    pub turn: usize,
    /// Display name of the winner, if the round is won.
    pub winner: Option<String>,
    /// Whether the round ended in a draw.
    pub draw: bool,
    /// The completed line, when the round was won on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_line: Option<[usize; 3]>,
    /// Every accepted move of the round, in order.
    pub move_log: Vec<MoveRecord>,
    /// Both participants' names and markers.
    pub roster: Vec<ParticipantInfo>,
    /// Seconds on the clock for the next turn; 0 means no clock is running.
    pub timer_seconds: u64,
    /// Present when the round ended for a reason other than a normal move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
}

/// Messages the coordinator may push to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Confirms a join, carrying the assigned match and seat.
    #[serde(rename_all = "camelCase")]
    Joined {
        /// The match entered.
        match_id: MatchId,
        /// Roster index assigned to the joiner.
        seat: usize,
    },
    /// The match has a single participant; play starts on the next join.
    WaitingForOpponent,
    /// The requested marker collided and a fallback was assigned.
    MarkerReassigned {
        /// The marker now in effect.
        marker: String,
    },
    /// The roster changed; sent to every participant after a join.
    RosterUpdated {
        /// Current names and markers, in seat order.
        roster: Vec<ParticipantInfo>,
    },
    /// A round began with a full roster.
    RoundStarted {
        /// Roster index of the participant to move first.
        turn: usize,
    },
    /// A fresh turn countdown is running.
    TimerStarted {
        /// Countdown length in seconds.
        seconds: u64,
    },
    /// A move or timeout advanced the match.
    StateUpdated(StateSnapshot),
    /// The match was reset in place.
    #[serde(rename_all = "camelCase")]
    MatchReset {
        /// The cleared grid.
        grid: [Option<String>; 9],
        /// Roster index of the participant to move first.
        turn: usize,
        /// Current names and markers.
        roster: Vec<ParticipantInfo>,
        /// Seconds on the clock for the first turn.
        timer_seconds: u64,
    },
    /// The other participant's connection closed; the match is gone.
    OpponentLeft,
    /// Answer to a leaderboard request.
    LeaderboardSnapshot {
        /// Win/loss/draw tallies keyed by display name.
        entries: BTreeMap<String, Tally>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_events_use_camel_case_tags() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"join","name":"ada","marker":"❌"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::Join {
                name: "ada".into(),
                marker: "❌".into()
            }
        );

        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"move","matchId":7,"cell":4}"#).unwrap();
        assert_eq!(event, ClientEvent::Move { match_id: 7, cell: 4 });
    }

    #[test]
    fn test_state_snapshot_round_trips() {
        let snapshot = StateSnapshot {
            grid: std::array::from_fn(|i| (i == 0).then(|| "❌".to_string())),
            turn: 1,
            winner: None,
            draw: false,
            winning_line: None,
            move_log: vec![MoveRecord {
                player_name: "ada".into(),
                index: 0,
            }],
            roster: vec![ParticipantInfo {
                name: "ada".into(),
                marker: "❌".into(),
            }],
            timer_seconds: 30,
            reason: None,
        };
        let json = serde_json::to_string(&ServerEvent::StateUpdated(snapshot.clone())).unwrap();
        assert!(json.contains(r#""type":"stateUpdated""#));
        assert!(json.contains(r#""timerSeconds":30"#));
        // Absent options stay off the wire entirely.
        assert!(!json.contains("winningLine"));
        assert!(!json.contains("reason"));

        let decoded: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, ServerEvent::StateUpdated(snapshot));
    }

    #[test]
    fn test_timeout_reason_is_tagged() {
        let json = serde_json::to_string(&EndReason::Timeout).unwrap();
        assert_eq!(json, r#""timeout""#);
    }
}
