//! Scripted gesture stream for headless runs
//!
//! A replay file is a JSON array with one entry per frame: a gesture id, or
//! `null` for a frame in which no hand was seen.

use std::collections::VecDeque;
use std::path::Path;

use super::GestureSource;
use crate::error::{ArcadeError, Result};
use crate::gesture::GestureSample;

#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Option<u8>>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let frames: Vec<Option<u8>> = serde_json::from_str(json)?;
        Ok(Self::new(frames))
    }

    /// Read a replay script. Any failure is fatal for the session.
    pub fn from_path(path: &Path) -> Result<Self> {
        let replay_err = |reason: String| ArcadeError::Replay {
            path: path.to_path_buf(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| replay_err(e.to_string()))?;
        let source = Self::from_json(&raw).map_err(|e| replay_err(e.to_string()))?;
        log::info!("loaded {} replay frames from {}", source.remaining(), path.display());
        Ok(source)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl GestureSource for ReplaySource {
    fn next_sample(&mut self) -> Option<GestureSample> {
        self.frames
            .pop_front()
            .map(|gesture_id| GestureSample { gesture_id })
    }

    fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_finishes() {
        let mut source = ReplaySource::from_json("[2, null, 4]").expect("parse");
        assert_eq!(source.next_sample(), Some(GestureSample::hand(2)));
        assert_eq!(source.next_sample(), Some(GestureSample::no_hand()));
        assert!(!source.is_finished());
        assert_eq!(source.next_sample(), Some(GestureSample::hand(4)));
        assert!(source.is_finished());
        assert_eq!(source.next_sample(), None);
    }

    #[test]
    fn test_bad_script_is_replay_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.json");
        std::fs::write(&path, "[1, \"left\"]").expect("write");
        assert!(matches!(ReplaySource::from_path(&path), Err(ArcadeError::Replay { .. })));
        assert!(matches!(
            ReplaySource::from_path(&dir.path().join("missing.json")),
            Err(ArcadeError::Replay { .. })
        ));
    }
}
