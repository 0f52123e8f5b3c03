//! Tagged entity model
//!
//! Every object in every variant is an `Entity`: a box, a velocity and a few
//! payload fields whose meaning depends on `kind`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;

pub type EntityId = u32;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Alien,
}

/// Entity discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Ghost,
    Wall,
    Pellet,
    Paddle,
    Ball,
    Brick,
    Frog,
    Vehicle,
    GoalZone,
    Alien,
    Bullet(Faction),
    PowerUp(PowerUpKind),
    PlatformBlock,
}

impl EntityKind {
    /// Solid entities block continuous movement
    pub fn is_solid(&self) -> bool {
        matches!(self, EntityKind::Wall | EntityKind::PlatformBlock)
    }
}

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    /// True if `other` lies entirely inside this box
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && b_max.x <= a_max.x
            && b_max.y <= a_max.y
    }
}

/// A game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-tick velocity (continuous movers) or unit step (grid movers)
    pub vel: Vec2,
    /// Score awarded when collected/destroyed
    pub points: u32,
    /// Colour/type tag for presentation
    pub tag: u8,
    /// Per-entity tick counter (ghost wander timer)
    pub timer: u32,
    /// Goal zone occupancy, power pellet marker
    pub filled: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            vel: Vec2::ZERO,
            points: 0,
            tag: 0,
            timer: 0,
            filled: false,
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_tag(mut self, tag: u8) -> Self {
        self.tag = tag;
        self
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn collides(&self, other: &Entity) -> bool {
        self.aabb().intersects(&other.aabb())
    }
}

/// Ordered collection of entities (stable iteration by insertion)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    entities: Vec<Entity>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn retain<F: FnMut(&Entity) -> bool>(&mut self, f: F) {
        self.entities.retain(f);
    }

    /// Remove and return every entity matching the predicate, keeping order
    pub fn extract<F: FnMut(&Entity) -> bool>(&mut self, mut f: F) -> Vec<Entity> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.entities.len());
        for entity in self.entities.drain(..) {
            if f(&entity) {
                taken.push(entity);
            } else {
                kept.push(entity);
            }
        }
        self.entities = kept;
        taken
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl FromIterator<Entity> for Group {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

/// Monotonic entity id source, owned by each variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
