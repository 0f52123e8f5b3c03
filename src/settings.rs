//! Arcade settings
//!
//! Loaded from a JSON file; any field left out takes its default, and a
//! missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEBOUNCE_TICKS, GESTURE_WINDOW, TICK_RATE_HZ};
use crate::error::Result;
use crate::persistence;

/// Arcade settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Fixed simulation rate
    pub tick_rate_hz: u32,
    /// RNG seed; `None` picks one per session
    pub seed: Option<u64>,

    // === Gesture input ===
    /// Frames in the majority-vote window
    pub gesture_window: usize,
    /// Frames a debounced command blocks the next
    pub debounce_ticks: u32,
    /// Longest the loop waits for a gesture sample before treating the frame
    /// as missing
    pub acquisition_budget_ms: u64,

    // === Storage ===
    /// Leaderboard file
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            seed: None,

            gesture_window: GESTURE_WINDOW,
            debounce_ticks: DEBOUNCE_TICKS,
            acquisition_budget_ms: 10,

            high_score_path: PathBuf::from("high_scores.json"),
        }
    }
}

impl Settings {
    /// Duration of one simulation tick
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }

    pub fn acquisition_budget(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.acquisition_budget_ms)
    }

    /// Load settings from `path`, falling back to defaults when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let settings: Settings = persistence::read_json(path)?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::write_json(path, self)?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp values the frame loop cannot run with
    fn sanitized(mut self) -> Self {
        if self.tick_rate_hz == 0 {
            log::warn!("tick_rate_hz of 0 ignored");
            self.tick_rate_hz = TICK_RATE_HZ;
        }
        if self.gesture_window == 0 {
            log::warn!("gesture_window of 0 ignored");
            self.gesture_window = GESTURE_WINDOW;
        }
        self
    }
}
