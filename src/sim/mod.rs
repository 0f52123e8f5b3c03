//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each group)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod levels;
pub mod powerup;
pub mod state;
pub mod variants;

pub use collision::{
    Direction, GroupHit, any_collision, move_continuous, query_collisions,
    query_group_collisions, step_discrete, take_collisions,
};
pub use entity::{Aabb, Entity, EntityId, EntityKind, Faction, Group, IdAllocator};
pub use powerup::{Loadout, PowerUpKind, PowerUpManager};
pub use state::{GameEvent, GamePhase, GameState};
pub use variants::{BreakoutGame, CrossingGame, Game, MazeGame, ShooterGame, VariantKind};
