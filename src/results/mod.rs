//! Finished-round records, where they are stored, and how players rank

pub mod leaderboard;
pub mod store;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::snippets::Difficulty;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use store::JsonlStore;

/// What gets persisted once a round has a final outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player: String,
    pub language: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub won: bool,
    pub answer: String,
    pub wrong_guesses: u32,
    /// Seconds since the UNIX epoch
    pub played_at: u64,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Destination for finished rounds. A failed save never affects the round.
pub trait ResultSink: Send + Sync + 'static {
    fn save(&self, record: &GameRecord) -> Result<()>;
}
