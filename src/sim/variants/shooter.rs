//! Grid shooter: clear the marching alien formation before it lands.
//!
//! Destroyed aliens may drop power-ups. Their effects run on wall-clock time,
//! so `step` takes `now` (time since session start) alongside the command.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::difficulty_scale;
use crate::gesture::Command;
use crate::sim::collision::{clamp_horizontal, query_group_collisions, take_collisions};
use crate::sim::entity::{Entity, EntityId, EntityKind, Faction, Group, IdAllocator};
use crate::sim::levels::{ALIEN_COLUMNS, ALIEN_ORIGIN, ALIEN_ROWS, ALIEN_SIZE, ALIEN_SPACING};
use crate::sim::powerup::{PowerUpKind, PowerUpManager};
use crate::sim::state::{GameEvent, GameState};

pub const PLAYER_SIZE: f32 = 50.0;
pub const PLAYER_SPEED: f32 = 10.0;
pub const BULLET_SIZE: Vec2 = Vec2::new(5.0, 15.0);
pub const PLAYER_BULLET_SPEED: f32 = 10.0;
pub const ALIEN_BULLET_SPEED: f32 = 5.0;
/// Horizontal spread of the outer multi-shot bullets
pub const SPREAD_SPEED: f32 = 3.0;
pub const FORMATION_SPEED: f32 = 2.0;
pub const FORMATION_DROP: f32 = 10.0;
/// A random alien fires on this tick interval
pub const ALIEN_FIRE_TICKS: u32 = 15;
pub const POWERUP_SIZE: f32 = 20.0;
pub const POWERUP_FALL_SPEED: f32 = 3.0;
pub const POWERUP_DROP_CHANCE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct ShooterGame {
    state: GameState,
    rng: Pcg32,
    ids: IdAllocator,
    player: Entity,
    player_start: Vec2,
    aliens: Group,
    player_bullets: Group,
    alien_bullets: Group,
    powerup_drops: Group,
    powerups: PowerUpManager,
    /// +1 marching right, -1 marching left
    formation_dir: f32,
    shot_timer: u32,
    fire_timer: u32,
}

impl ShooterGame {
    pub fn new(seed: u64) -> Self {
        let mut ids = IdAllocator::default();
        let player_start = Vec2::new(ARENA_WIDTH / 2.0 - PLAYER_SIZE / 2.0, ARENA_HEIGHT - 80.0);
        let player = Entity::new(
            ids.next_id(),
            EntityKind::Player,
            player_start,
            Vec2::splat(PLAYER_SIZE),
        );

        let mut game = Self {
            state: GameState::new(),
            rng: Pcg32::seed_from_u64(seed),
            ids,
            player,
            player_start,
            aliens: Group::new(),
            player_bullets: Group::new(),
            alien_bullets: Group::new(),
            powerup_drops: Group::new(),
            powerups: PowerUpManager::new(),
            formation_dir: 1.0,
            shot_timer: 0,
            fire_timer: 0,
        };
        game.build_formation();
        game.state.start();
        game
    }

    fn build_formation(&mut self) {
        self.aliens.clear();
        self.player_bullets.clear();
        self.alien_bullets.clear();
        self.formation_dir = 1.0;
        self.fire_timer = 0;

        for (row, &(tag, points)) in ALIEN_ROWS.iter().enumerate() {
            for col in 0..ALIEN_COLUMNS {
                let pos = Vec2::new(
                    ALIEN_ORIGIN.0 + col as f32 * ALIEN_SPACING.0,
                    ALIEN_ORIGIN.1 + row as f32 * ALIEN_SPACING.1,
                );
                let alien = Entity::new(
                    self.ids.next_id(),
                    EntityKind::Alien,
                    pos,
                    Vec2::new(ALIEN_SIZE.0, ALIEN_SIZE.1),
                )
                .with_points(points)
                .with_tag(tag);
                self.aliens.add(alien);
            }
        }
        log::debug!(
            "shooter level {} formation built, speed {:.2}",
            self.state.level,
            self.formation_speed()
        );
    }

    fn formation_speed(&self) -> f32 {
        FORMATION_SPEED * difficulty_scale(self.state.level)
    }

    /// Advance one tick
    pub fn step(&mut self, command: Command, now: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.begin_tick() {
            return events;
        }

        for kind in self.powerups.tick(now) {
            events.push(GameEvent::PowerUpExpired(kind));
        }
        self.shot_timer = self.shot_timer.saturating_sub(1);

        // Movement
        let speed = PLAYER_SPEED * self.powerups.loadout().speed_multiplier;
        match command {
            Command::Left => self.player.pos.x -= speed,
            Command::Right => self.player.pos.x += speed,
            _ => {}
        }
        clamp_horizontal(&mut self.player, ARENA_WIDTH);

        for bullet in self
            .player_bullets
            .iter_mut()
            .chain(self.alien_bullets.iter_mut())
            .chain(self.powerup_drops.iter_mut())
        {
            bullet.pos += bullet.vel;
        }
        self.march_formation();

        // Player fire against the formation
        let mut destroyed: Vec<EntityId> = Vec::new();
        let hits = query_group_collisions(&mut self.player_bullets, &mut self.aliens, true, true);
        for alien in hits.into_iter().flat_map(|hit| hit.hits) {
            if destroyed.contains(&alien.id) {
                continue;
            }
            destroyed.push(alien.id);
            let points = alien.points * self.powerups.loadout().score_multiplier;
            self.state.add_score(points, &mut events);
            self.maybe_drop_powerup(&alien);
        }

        // Collectibles
        for drop in take_collisions(&self.player, &mut self.powerup_drops) {
            if let EntityKind::PowerUp(kind) = drop.kind {
                self.powerups.activate(kind, now);
                events.push(GameEvent::PowerUpCollected(kind));
            }
        }

        // Hazards: each alien bullet or alien body touching the player is one
        // hit; the shield takes the first, anything left costs a life
        let hazards = take_collisions(&self.player, &mut self.alien_bullets).len()
            + take_collisions(&self.player, &mut self.aliens).len();
        let mut life_lost = false;
        for _ in 0..hazards {
            if self.powerups.absorb_hit() {
                events.push(GameEvent::ShieldAbsorbed);
            } else {
                life_lost = true;
                break;
            }
        }

        // Invasion cannot be shielded
        let player_row = self.player.top();
        if self.aliens.iter().any(|alien| alien.bottom() >= player_row) {
            self.lift_formation();
            life_lost = true;
        }

        if life_lost {
            if self.state.lose_life(&mut events) {
                return events;
            }
            self.player.pos = self.player_start;
            self.alien_bullets.clear();
        }

        // A life lost this tick keeps its phase; the level completes next tick
        if !life_lost && self.aliens.is_empty() {
            self.state.complete_level(&mut events);
            self.build_formation();
        }

        // Spawns
        if command == Command::Action && self.shot_timer == 0 {
            self.fire_player();
        }
        self.fire_timer += 1;
        if self.fire_timer >= ALIEN_FIRE_TICKS {
            self.fire_timer = 0;
            self.fire_alien();
        }

        self.despawn_offscreen();
        events
    }

    /// Slide the block sideways; at an edge reverse and step down
    fn march_formation(&mut self) {
        let dx = self.formation_dir * self.formation_speed();
        for alien in self.aliens.iter_mut() {
            alien.pos.x += dx;
        }

        let at_edge = self.aliens.iter().any(|alien| {
            (dx > 0.0 && alien.right() >= ARENA_WIDTH) || (dx < 0.0 && alien.left() <= 0.0)
        });
        if at_edge {
            self.formation_dir = -self.formation_dir;
            for alien in self.aliens.iter_mut() {
                alien.pos.y += FORMATION_DROP;
            }
        }
    }

    /// Put the formation back at the top after it reached the player's row
    fn lift_formation(&mut self) {
        let top = self
            .aliens
            .iter()
            .map(|alien| alien.top())
            .fold(f32::INFINITY, f32::min);
        let shift = top - ALIEN_ORIGIN.1;
        for alien in self.aliens.iter_mut() {
            alien.pos.y -= shift;
        }
        log::info!("aliens reached the player row, formation lifted by {shift:.0}");
    }

    fn fire_player(&mut self) {
        let origin = Vec2::new(
            self.player.center().x - BULLET_SIZE.x / 2.0,
            self.player.top() - BULLET_SIZE.y,
        );
        let spreads: &[f32] = if self.powerups.loadout().multi_shot {
            &[-SPREAD_SPEED, 0.0, SPREAD_SPEED]
        } else {
            &[0.0]
        };
        for &vx in spreads {
            let bullet = Entity::new(
                self.ids.next_id(),
                EntityKind::Bullet(Faction::Player),
                origin,
                BULLET_SIZE,
            )
            .with_vel(Vec2::new(vx, -PLAYER_BULLET_SPEED));
            self.player_bullets.add(bullet);
        }
        self.shot_timer = self.powerups.loadout().shot_cooldown;
    }

    /// A random surviving alien fires straight down in its own colour
    fn fire_alien(&mut self) {
        if self.aliens.is_empty() {
            return;
        }
        let idx = self.rng.random_range(0..self.aliens.len());
        let alien = &self.aliens.as_slice()[idx];
        let origin = Vec2::new(alien.center().x - BULLET_SIZE.x / 2.0, alien.bottom());
        let bullet = Entity::new(
            self.ids.next_id(),
            EntityKind::Bullet(Faction::Alien),
            origin,
            BULLET_SIZE,
        )
        .with_vel(Vec2::new(0.0, ALIEN_BULLET_SPEED))
        .with_tag(alien.tag);
        self.alien_bullets.add(bullet);
    }

    fn maybe_drop_powerup(&mut self, alien: &Entity) {
        if !self.rng.random_bool(POWERUP_DROP_CHANCE) {
            return;
        }
        let kind = PowerUpKind::random(&mut self.rng);
        let drop = Entity::new(
            self.ids.next_id(),
            EntityKind::PowerUp(kind),
            alien.center() - Vec2::splat(POWERUP_SIZE / 2.0),
            Vec2::splat(POWERUP_SIZE),
        )
        .with_vel(Vec2::new(0.0, POWERUP_FALL_SPEED));
        log::debug!("alien {} dropped {}", alien.id, kind.as_str());
        self.powerup_drops.add(drop);
    }

    fn despawn_offscreen(&mut self) {
        self.player_bullets.retain(|b| b.bottom() > 0.0);
        self.alien_bullets.retain(|b| b.top() < ARENA_HEIGHT);
        self.powerup_drops.retain(|p| p.top() < ARENA_HEIGHT);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn aliens(&self) -> &Group {
        &self.aliens
    }

    pub fn player_bullets(&self) -> &Group {
        &self.player_bullets
    }

    pub fn alien_bullets(&self) -> &Group {
        &self.alien_bullets
    }

    pub fn powerup_drops(&self) -> &Group {
        &self.powerup_drops
    }

    pub fn powerups(&self) -> &PowerUpManager {
        &self.powerups
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.aliens
            .iter()
            .chain(self.player_bullets.iter())
            .chain(self.alien_bullets.iter())
            .chain(self.powerup_drops.iter())
            .chain(std::iter::once(&self.player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    const T0: Duration = Duration::ZERO;

    fn single_alien(game: &mut ShooterGame, pos: Vec2) {
        game.aliens.clear();
        let alien = Entity::new(500, EntityKind::Alien, pos, Vec2::new(ALIEN_SIZE.0, ALIEN_SIZE.1))
            .with_points(30);
        game.aliens.add(alien);
    }

    fn alien_bullet_at(pos: Vec2) -> Entity {
        Entity::new(800, EntityKind::Bullet(Faction::Alien), pos, BULLET_SIZE)
            .with_vel(Vec2::new(0.0, ALIEN_BULLET_SPEED))
    }

    #[test]
    fn test_setup_formation() {
        let game = ShooterGame::new(1);
        assert_eq!(game.aliens().len(), 50);
        let total: u32 = game.aliens().iter().map(|a| a.points).sum();
        assert_eq!(total, 10 * (30 + 20 + 20 + 10 + 10));
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut game = ShooterGame::new(1);
        let start = game.player().pos.x;
        game.step(Command::Right, T0);
        assert_eq!(game.player().pos.x, start + PLAYER_SPEED);
        for _ in 0..100 {
            game.step(Command::Right, T0);
            game.alien_bullets.clear();
        }
        assert_eq!(game.player().right(), ARENA_WIDTH);
    }

    #[test]
    fn test_shot_cooldown() {
        let mut game = ShooterGame::new(1);
        game.step(Command::Action, T0);
        assert_eq!(game.player_bullets().len(), 1);
        for _ in 0..29 {
            game.step(Command::Action, T0);
        }
        assert_eq!(game.player_bullets().len(), 1);
        game.step(Command::Action, T0);
        assert_eq!(game.player_bullets().len(), 2);
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::RapidFire, T0);
        for _ in 0..11 {
            game.step(Command::Action, T0);
        }
        assert_eq!(game.player_bullets().len(), 2);
    }

    #[test]
    fn test_multi_shot_spread() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::MultiShot, T0);
        game.step(Command::Action, T0);
        let mut vx: Vec<f32> = game.player_bullets().iter().map(|b| b.vel.x).collect();
        vx.sort_by(f32::total_cmp);
        assert_eq!(vx, vec![-SPREAD_SPEED, 0.0, SPREAD_SPEED]);
    }

    #[test]
    fn test_speed_boost() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::SpeedBoost, T0);
        let start = game.player().pos.x;
        game.step(Command::Left, T0);
        assert_eq!(game.player().pos.x, start - PLAYER_SPEED * 1.5);
    }

    #[test]
    fn test_last_alien_completes_level() {
        let mut game = ShooterGame::new(1);
        let player = game.player().clone();
        single_alien(&mut game, Vec2::new(player.center().x - ALIEN_SIZE.0 / 2.0, 660.0));

        let mut phases = Vec::new();
        for _ in 0..3 {
            game.step(Command::Action, T0);
            phases.push(game.state().phase);
        }
        assert_eq!(phases, vec![GamePhase::Playing, GamePhase::Playing, GamePhase::LevelComplete]);
        assert_eq!(game.state().score, 30);
        assert_eq!(game.state().level, 2);
        assert_eq!(game.aliens().len(), 50);
        assert!(game.player_bullets().is_empty());

        game.step(Command::None, T0);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_score_multiplier_doubles_points() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::ScoreMultiplier, T0);
        let player = game.player().clone();
        single_alien(&mut game, Vec2::new(player.center().x - ALIEN_SIZE.0 / 2.0, 660.0));
        for _ in 0..3 {
            game.step(Command::Action, T0);
        }
        assert_eq!(game.state().score, 60);
    }

    #[test]
    fn test_formation_reverses_and_drops_at_edge() {
        let mut game = ShooterGame::new(1);
        single_alien(&mut game, Vec2::new(ARENA_WIDTH - ALIEN_SIZE.0 - 1.0, 100.0));
        game.step(Command::None, T0);
        let alien = game.aliens().iter().next().cloned().expect("alien");
        assert_eq!(alien.pos.y, 110.0);
        assert_eq!(game.formation_dir, -1.0);

        game.step(Command::None, T0);
        let moved = game.aliens().iter().next().map(|a| a.pos.x).unwrap_or_default();
        assert_eq!(moved, alien.pos.x - FORMATION_SPEED);
    }

    #[test]
    fn test_alien_fire_interval() {
        let mut game = ShooterGame::new(3);
        for _ in 0..ALIEN_FIRE_TICKS - 1 {
            game.step(Command::None, T0);
        }
        assert!(game.alien_bullets().is_empty());
        game.step(Command::None, T0);
        assert_eq!(game.alien_bullets().len(), 1);
        let bullet = game.alien_bullets().iter().next().cloned().expect("bullet");
        assert!(bullet.vel.y > 0.0);
        assert!(ALIEN_ROWS.iter().any(|(tag, _)| *tag == bullet.tag));
    }

    #[test]
    fn test_shield_absorbs_one_hit() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::Shield, T0);
        let pos = game.player().pos;
        game.alien_bullets.add(alien_bullet_at(pos));

        let events = game.step(Command::None, T0);
        assert!(events.contains(&GameEvent::ShieldAbsorbed));
        assert_eq!(game.state().lives, 3);
        assert!(game.alien_bullets().is_empty());
        assert!(!game.powerups().is_active(PowerUpKind::Shield));

        game.alien_bullets.add(alien_bullet_at(pos));
        game.step(Command::None, T0);
        assert_eq!(game.state().lives, 2);
        assert_eq!(game.state().phase, GamePhase::LifeLost);
    }

    #[test]
    fn test_alien_touch_costs_life() {
        let mut game = ShooterGame::new(1);
        let pos = game.player().pos;
        let size = Vec2::new(ALIEN_SIZE.0, ALIEN_SIZE.1);
        game.aliens.add(Entity::new(900, EntityKind::Alien, pos, size));
        game.step(Command::None, T0);
        assert_eq!(game.state().lives, 2);
        assert!(game.aliens().get(900).is_none());
    }

    #[test]
    fn test_ramming_last_alien_shows_life_lost_first() {
        let mut game = ShooterGame::new(1);
        let pos = game.player().pos;
        single_alien(&mut game, pos);

        let events = game.step(Command::None, T0);
        assert_eq!(game.state().phase, GamePhase::LifeLost);
        assert_eq!(game.state().lives, 2);
        assert_eq!(game.state().level, 1);
        assert!(game.aliens().is_empty());
        assert!(events.iter().any(|e| matches!(e, GameEvent::LifeLost { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));

        game.step(Command::None, T0);
        assert_eq!(game.state().phase, GamePhase::LevelComplete);
        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().lives, 2);
        assert_eq!(game.aliens().len(), 50);
    }

    #[test]
    fn test_invasion_lifts_formation_and_ignores_shield() {
        let mut game = ShooterGame::new(1);
        game.powerups.activate(PowerUpKind::Shield, T0);
        let row = game.player().top();
        single_alien(&mut game, Vec2::new(10.0, row - ALIEN_SIZE.1 + 1.0));

        game.step(Command::None, T0);
        assert_eq!(game.state().lives, 2);
        assert!(game.powerups().is_active(PowerUpKind::Shield));
        let alien = game.aliens().iter().next().cloned().expect("alien");
        assert_eq!(alien.top(), ALIEN_ORIGIN.1);
    }

    #[test]
    fn test_powerup_pickup_and_expiry() {
        let mut game = ShooterGame::new(1);
        let pos = game.player().pos;
        let drop = Entity::new(
            700,
            EntityKind::PowerUp(PowerUpKind::MultiShot),
            pos,
            Vec2::splat(POWERUP_SIZE),
        )
        .with_vel(Vec2::new(0.0, POWERUP_FALL_SPEED));
        game.powerup_drops.add(drop);

        let events = game.step(Command::None, Duration::from_secs(1));
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::MultiShot)));
        assert!(game.powerups().loadout().multi_shot);

        let events = game.step(Command::None, Duration::from_secs(9));
        assert!(events.contains(&GameEvent::PowerUpExpired(PowerUpKind::MultiShot)));
        assert!(!game.powerups().loadout().multi_shot);
    }

    #[test]
    fn test_lives_run_out() {
        let mut game = ShooterGame::new(1);
        for _ in 0..3 {
            let pos = game.player().pos;
            game.alien_bullets.add(alien_bullet_at(pos));
            game.step(Command::None, T0);
        }
        assert!(game.state().is_over());
        assert!(game.step(Command::Action, T0).is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = ShooterGame::new(17);
        let mut b = ShooterGame::new(17);
        for tick in 0..600 {
            let command = if tick % 40 < 20 { Command::Left } else { Command::Action };
            a.step(command, T0);
            b.step(command, T0);
        }
        assert_eq!(a.state(), b.state());
        let pa: Vec<_> = a.entities().map(|e| e.pos).collect();
        let pb: Vec<_> = b.entities().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }
}
