//! High score leaderboard
//!
//! Persisted as a JSON array of `{ "name", "score" }` objects, tracks the top 5.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;
/// Maximum initials length
pub const MAX_NAME_LEN: usize = 3;
/// Name recorded when the player leaves the prompt blank
pub const ANONYMOUS_NAME: &str = "???";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player initials
    pub name: String,
    pub score: u64,
}

/// Top-5 leaderboard, sorted descending by score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<HighScoreEntry>,
}

/// Trim, upper-case and cut to three characters
pub fn normalize_name(name: &str) -> String {
    let name: String = name
        .trim()
        .chars()
        .flat_map(char::to_uppercase)
        .take(MAX_NAME_LEN)
        .collect();
    if name.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        name
    }
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary entries, restoring order and size
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.name = normalize_name(&entry.name);
        }
        // Stable sort keeps earlier entries ahead on equal scores
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a score if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn record(&mut self, name: &str, score: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        let entry = HighScoreEntry {
            name: normalize_name(name),
            score,
        };
        log::info!("high score {} by {} at rank {}", score, entry.name, rank);
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[HighScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from disk. A missing or unreadable file gives an empty board.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no high score file at {}, starting fresh", path.display());
            return Self::new();
        }
        match persistence::read_json::<Vec<HighScoreEntry>>(path) {
            Ok(entries) => {
                let board = Self::from_entries(entries);
                log::info!("loaded {} high scores", board.len());
                board
            }
            Err(err) => {
                log::warn!("ignoring high score file {}: {}", path.display(), err);
                Self::new()
            }
        }
    }

    /// Atomically write the board, recreating the file if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::write_json(path, &self.entries)?;
        log::info!("high scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
