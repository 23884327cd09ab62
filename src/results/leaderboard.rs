use std::collections::HashMap;

use super::GameRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub player: String,
    pub total_score: u64,
    pub games_played: u32,
    pub games_won: u32,
    pub best_score: u32,
}

/// Players ranked by total score, then wins, then name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a GameRecord>) -> Self {
        let mut by_player: HashMap<&str, LeaderboardEntry> = HashMap::new();

        for record in records {
            let entry = by_player
                .entry(record.player.as_str())
                .or_insert_with(|| LeaderboardEntry {
                    rank: 0,
                    player: record.player.clone(),
                    total_score: 0,
                    games_played: 0,
                    games_won: 0,
                    best_score: 0,
                });
            entry.total_score += u64::from(record.score);
            entry.games_played += 1;
            if record.won {
                entry.games_won += 1;
            }
            entry.best_score = entry.best_score.max(record.score);
        }

        let mut entries: Vec<LeaderboardEntry> = by_player.into_values().collect();
        entries.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(b.games_won.cmp(&a.games_won))
                .then_with(|| a.player.cmp(&b.player))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[LeaderboardEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, player: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.player == player)
    }
}
