//! Game state shared by every variant
//!
//! Score, lives, level and phase live here; entities belong to the variant.

use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use crate::consts::START_LIVES;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level 1 being built
    Setup,
    /// Active gameplay
    Playing,
    /// A life was lost this frame; the controlled entity has been respawned
    LifeLost,
    /// The level was cleared this frame; the next level is already built
    LevelComplete,
    /// Session ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::Playing => "playing",
            GamePhase::LifeLost => "life_lost",
            GamePhase::LevelComplete => "level_complete",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Something that happened during a step, for the frontend and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Scored { points: u32 },
    LifeLost { lives_left: u32 },
    LevelComplete { next_level: u32 },
    GameOver { score: u64 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ShieldAbsorbed,
    GoalFilled,
}

/// Score/lives/level bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub phase: GamePhase,
    /// Simulation ticks since setup
    pub time_ticks: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: GamePhase::Setup,
            time_ticks: 0,
        }
    }

    /// Setup finished, start playing
    pub fn start(&mut self) {
        debug_assert_eq!(self.phase, GamePhase::Setup);
        self.phase = GamePhase::Playing;
    }

    /// Begin a new tick. One-frame phases fall back to `Playing`.
    /// Returns `false` when the session is over and nothing should run.
    pub fn begin_tick(&mut self) -> bool {
        match self.phase {
            GamePhase::GameOver => false,
            GamePhase::Setup | GamePhase::LifeLost | GamePhase::LevelComplete => {
                self.phase = GamePhase::Playing;
                self.time_ticks += 1;
                true
            }
            GamePhase::Playing => {
                self.time_ticks += 1;
                true
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Award points. Score never decreases.
    pub fn add_score(&mut self, points: u32, events: &mut Vec<GameEvent>) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points as u64);
        events.push(GameEvent::Scored { points });
    }

    /// Take a life. Returns `true` if that ended the game.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("game over at level {} with score {}", self.level, self.score);
            events.push(GameEvent::LifeLost { lives_left: 0 });
            events.push(GameEvent::GameOver { score: self.score });
            true
        } else {
            self.phase = GamePhase::LifeLost;
            log::info!("life lost, {} left", self.lives);
            events.push(GameEvent::LifeLost {
                lives_left: self.lives,
            });
            false
        }
    }

    /// Advance to the next level
    pub fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        self.level += 1;
        self.phase = GamePhase::LevelComplete;
        log::info!("level complete, advancing to level {}", self.level);
        events.push(GameEvent::LevelComplete {
            next_level: self.level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = GameState::new();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Setup);
    }

    #[test]
    fn test_life_lost_then_resume() {
        let mut state = GameState::new();
        state.start();
        let mut events = Vec::new();
        assert!(!state.lose_life(&mut events));
        assert_eq!(state.phase, GamePhase::LifeLost);
        assert!(state.begin_tick());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut state = GameState::new();
        state.start();
        let mut events = Vec::new();
        state.lose_life(&mut events);
        state.lose_life(&mut events);
        assert!(state.lose_life(&mut events));
        assert!(state.is_over());
        assert!(!state.begin_tick());
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    }
}
