//! The four game variants and the `Game` dispatcher

pub mod breakout;
pub mod crossing;
pub mod maze;
pub mod shooter;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use breakout::BreakoutGame;
pub use crossing::CrossingGame;
pub use maze::MazeGame;
pub use shooter::ShooterGame;

use super::entity::Entity;
use super::state::{GameEvent, GameState};
use crate::gesture::{Command, DecoderPolicy};

/// Game selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Maze,
    Breakout,
    Crossing,
    Shooter,
}

impl VariantKind {
    pub const ALL: [VariantKind; 4] = [
        VariantKind::Maze,
        VariantKind::Breakout,
        VariantKind::Crossing,
        VariantKind::Shooter,
    ];

    /// Crossing hops on debounced commands; everything else steers continuously
    pub fn policy(&self) -> DecoderPolicy {
        match self {
            VariantKind::Crossing => DecoderPolicy::Debounced,
            VariantKind::Maze | VariantKind::Breakout | VariantKind::Shooter => {
                DecoderPolicy::Continuous
            }
        }
    }

    /// Only the shooter keeps a leaderboard
    pub fn records_high_score(&self) -> bool {
        matches!(self, VariantKind::Shooter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Maze => "maze",
            VariantKind::Breakout => "breakout",
            VariantKind::Crossing => "crossing",
            VariantKind::Shooter => "shooter",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown game '{s}' (expected maze, breakout, crossing or shooter)")
            })
    }
}

/// A running game of any variant
#[derive(Debug, Clone)]
pub enum Game {
    Maze(MazeGame),
    Breakout(BreakoutGame),
    Crossing(CrossingGame),
    Shooter(ShooterGame),
}

impl Game {
    /// Set up level 1. `seed` drives every random choice in the session.
    pub fn new(kind: VariantKind, seed: u64) -> Self {
        log::info!("starting {} (seed {})", kind.as_str(), seed);
        match kind {
            VariantKind::Maze => Game::Maze(MazeGame::new(seed)),
            VariantKind::Breakout => Game::Breakout(BreakoutGame::new(seed)),
            VariantKind::Crossing => Game::Crossing(CrossingGame::new()),
            VariantKind::Shooter => Game::Shooter(ShooterGame::new(seed)),
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            Game::Maze(_) => VariantKind::Maze,
            Game::Breakout(_) => VariantKind::Breakout,
            Game::Crossing(_) => VariantKind::Crossing,
            Game::Shooter(_) => VariantKind::Shooter,
        }
    }

    pub fn state(&self) -> &GameState {
        match self {
            Game::Maze(game) => game.state(),
            Game::Breakout(game) => game.state(),
            Game::Crossing(game) => game.state(),
            Game::Shooter(game) => game.state(),
        }
    }

    /// Advance one tick. `now` is time since the session started; only the
    /// shooter's power-up timers read it.
    pub fn step(&mut self, command: Command, now: Duration) -> Vec<GameEvent> {
        match self {
            Game::Maze(game) => game.step(command),
            Game::Breakout(game) => game.step(command),
            Game::Crossing(game) => game.step(command),
            Game::Shooter(game) => game.step(command, now),
        }
    }

    /// Every live entity, for presentation
    pub fn entities(&self) -> Vec<&Entity> {
        match self {
            Game::Maze(game) => game.entities().collect(),
            Game::Breakout(game) => game.entities().collect(),
            Game::Crossing(game) => game.entities().collect(),
            Game::Shooter(game) => game.entities().collect(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.state().is_over()
    }
}
