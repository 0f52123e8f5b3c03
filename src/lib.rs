//! Gesture Arcade - retro arcade games driven by hand gestures
//!
//! Core modules:
//! - `gesture`: Majority-vote command decoding over the classifier stream
//! - `sim`: Deterministic simulation (entities, collisions, game variants)
//! - `platform`: Camera/landmark/classifier collaborator seams
//! - `session`: Fixed-tick frame loop and control surface
//! - `persistence`: Atomic JSON save/load
//! - `highscores`: Top-5 leaderboard

pub mod error;
pub mod gesture;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ArcadeError, Result};
pub use gesture::{Command, DecoderPolicy, GestureCommandDecoder, GestureSample};
pub use highscores::Leaderboard;
pub use session::{ExitSignal, SessionContext, run_variant};
pub use settings::Settings;
pub use sim::{Game, GamePhase, GameState, VariantKind};

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Playfield dimensions shared by every variant
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Lives at the start of a session
    pub const START_LIVES: u32 = 3;

    /// Hostile speed multiplier applied per cleared level
    pub const DIFFICULTY_FACTOR: f32 = 1.2;

    /// Gesture window length (frames) used for the majority vote
    pub const GESTURE_WINDOW: usize = 5;
    /// Frames a debounced command blocks further commands
    pub const DEBOUNCE_TICKS: u32 = 15;
}

/// Speed multiplier for a given level (level 1 = baseline)
#[inline]
pub fn difficulty_scale(level: u32) -> f32 {
    consts::DIFFICULTY_FACTOR.powi(level.saturating_sub(1) as i32)
}
