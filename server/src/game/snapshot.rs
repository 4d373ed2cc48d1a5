use std::sync::Arc;

use super::model::{Monster, Player};

/// Complete, immutable view of the shared game.
/// Sent to watchers on every state change and on subscribe.
///
/// Players are shared with the store copy-on-write, so a snapshot keeps
/// showing the values it was built with even after later attacks.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub monster: Monster,
    /// Ordered by player name.
    pub players: Vec<Arc<Player>>,
    pub timestamp: i64,
}

/// A player's running total in the click race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub player: String,
    pub score: i64,
}

/// All click race scores, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub scores: Vec<Score>,
}

impl Leaderboard {
    /// Rank scores by total descending; ties are broken by player name.
    pub fn ranked(mut scores: Vec<Score>) -> Self {
        scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)));
        Self { scores }
    }
}
