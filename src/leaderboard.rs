//! Cross-match win/loss/draw aggregation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// One finished round from a single participant's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RoundResult {
    /// The participant won the round.
    Win,
    /// The participant lost the round.
    Loss,
    /// The round was drawn.
    Draw,
}

/// Running counters for one display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost, timeouts included.
    pub losses: u32,
    /// Rounds drawn.
    pub draws: u32,
}

/// Process-lifetime aggregate keyed by display name.
///
/// Names are not uniquely owned: distinct matches sharing a display name
/// accumulate into the same entry. Entries are created lazily and never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Arc<Mutex<BTreeMap<String, Tally>>>,
}

impl Leaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one result for `name`. Empty names are ignored.
    #[instrument(skip(self))]
    pub fn record(&self, name: &str, result: RoundResult) {
        if name.is_empty() {
            debug!("result without a display name ignored");
            return;
        }
        let mut entries = self.entries.lock().unwrap();
        let tally = entries.entry(name.to_string()).or_default();
        match result {
            RoundResult::Win => tally.wins += 1,
            RoundResult::Loss => tally.losses += 1,
            RoundResult::Draw => tally.draws += 1,
        }
        debug!(name, %result, "result recorded");
    }

    /// Returns the full aggregate state.
    pub fn snapshot(&self) -> BTreeMap<String, Tally> {
        self.entries.lock().unwrap().clone()
    }
}
