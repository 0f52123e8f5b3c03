//! Movement and collision queries over axis-aligned boxes
//!
//! All collision in the arcade is box intersection. Movement comes in two
//! flavours: continuous movers (player, ghosts) that roll back fully when
//! they would end up inside a wall, and grid movers (the frog) whose step is
//! rejected outright when the destination leaves the level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Aabb, Entity, Group};
use crate::gesture::Command;

/// Cardinal direction (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Right => Vec2::X,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Up => Vec2::NEG_Y,
        }
    }

    pub fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Action | Command::None => None,
        }
    }
}

/// One entry of a group-vs-group query: an A entity and every B it hit
#[derive(Debug, Clone)]
pub struct GroupHit {
    pub entity: Entity,
    pub hits: Vec<Entity>,
}

/// Move by `delta`, rolling back to the starting position if the new box
/// overlaps any solid entity. Returns `true` when the move was blocked.
pub fn move_continuous<'a, I>(entity: &mut Entity, delta: Vec2, obstacles: I) -> bool
where
    I: IntoIterator<Item = &'a Entity>,
{
    let old_pos = entity.pos;
    entity.pos += delta;

    let blocked = obstacles
        .into_iter()
        .any(|other| other.kind.is_solid() && other.id != entity.id && entity.collides(other));

    if blocked {
        entity.pos = old_pos;
    }
    blocked
}

/// Snap one grid step. The step is taken only when the destination box lies
/// entirely within `bounds`; partial moves never happen.
pub fn step_discrete(entity: &mut Entity, direction: Direction, step: f32, bounds: &Aabb) -> bool {
    let dest = Aabb {
        min: entity.pos + direction.unit() * step,
        size: entity.size,
    };
    if bounds.contains(&dest) {
        entity.pos = dest.min;
        true
    } else {
        false
    }
}

/// Entities of `group` overlapping `entity`, in group order
pub fn query_collisions<'a>(entity: &Entity, group: &'a Group) -> Vec<&'a Entity> {
    group.iter().filter(|other| entity.collides(other)).collect()
}

/// Like [`query_collisions`] but removes the hit entities from the group
pub fn take_collisions(entity: &Entity, group: &mut Group) -> Vec<Entity> {
    group.extract(|other| entity.collides(other))
}

/// Whether anything in `group` overlaps `entity`
pub fn any_collision(entity: &Entity, group: &Group) -> bool {
    group.iter().any(|other| entity.collides(other))
}

/// Pairwise query between two groups.
///
/// Every pair is evaluated against the groups as they were when the query
/// started, so a B entity hit by several A entities is reported for each of
/// them. With `remove_a`/`remove_b` the participating entities are removed
/// from their owning group afterwards.
pub fn query_group_collisions(
    group_a: &mut Group,
    group_b: &mut Group,
    remove_a: bool,
    remove_b: bool,
) -> Vec<GroupHit> {
    let mut results = Vec::new();
    let mut hit_a = Vec::new();
    let mut hit_b = Vec::new();

    for a in group_a.iter() {
        let hits: Vec<Entity> = group_b
            .iter()
            .filter(|b| a.collides(b))
            .cloned()
            .collect();
        if hits.is_empty() {
            continue;
        }
        hit_a.push(a.id);
        for b in &hits {
            if !hit_b.contains(&b.id) {
                hit_b.push(b.id);
            }
        }
        results.push(GroupHit {
            entity: a.clone(),
            hits,
        });
    }

    if remove_a {
        group_a.retain(|e| !hit_a.contains(&e.id));
    }
    if remove_b {
        group_b.retain(|e| !hit_b.contains(&e.id));
    }
    results
}

/// Horizontal wrap-around: an entity leaving one side re-enters at the other
pub fn wrap_horizontal(entity: &mut Entity, width: f32) {
    if entity.vel.x > 0.0 && entity.left() > width {
        entity.pos.x = -entity.size.x;
    } else if entity.vel.x < 0.0 && entity.right() < 0.0 {
        entity.pos.x = width;
    }
}

/// Clamp an entity horizontally to `[0, width]`
pub fn clamp_horizontal(entity: &mut Entity, width: f32) {
    entity.pos.x = entity.pos.x.clamp(0.0, (width - entity.size.x).max(0.0));
}
