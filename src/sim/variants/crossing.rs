//! Lane crossing: hop the frog across traffic into every goal zone.
//!
//! The frog moves on a fixed 50-unit grid and only on debounced commands,
//! so a held gesture is one hop.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, DIFFICULTY_FACTOR};
use crate::gesture::Command;
use crate::sim::collision::{
    Direction, any_collision, query_collisions, step_discrete, wrap_horizontal,
};
use crate::sim::entity::{Aabb, Entity, EntityKind, Group, IdAllocator};
use crate::sim::levels::{
    GOAL_COUNT, GOAL_ORIGIN_X, GOAL_SIZE, GOAL_SPACING, GOAL_Y, LANES, VEHICLE_HEIGHT,
    VEHICLES_PER_LANE,
};
use crate::sim::state::{GameEvent, GameState};

pub const FROG_SIZE: f32 = 40.0;
pub const HOP_DISTANCE: f32 = 50.0;
pub const GOAL_POINTS: u32 = 200;

#[derive(Debug, Clone)]
pub struct CrossingGame {
    state: GameState,
    ids: IdAllocator,
    frog: Entity,
    frog_start: Vec2,
    bounds: Aabb,
    vehicles: Group,
    goals: Group,
}

impl CrossingGame {
    pub fn new() -> Self {
        let mut ids = IdAllocator::default();
        let frog_start = Vec2::new(ARENA_WIDTH / 2.0 - FROG_SIZE / 2.0, ARENA_HEIGHT - 60.0);
        let frog = Entity::new(
            ids.next_id(),
            EntityKind::Frog,
            frog_start,
            Vec2::splat(FROG_SIZE),
        );

        let mut game = Self {
            state: GameState::new(),
            ids,
            frog,
            frog_start,
            // Frog may roam from the goal strip down to the bottom edge
            bounds: Aabb::new(0.0, GOAL_Y, ARENA_WIDTH, ARENA_HEIGHT - GOAL_Y),
            vehicles: Group::new(),
            goals: Group::new(),
        };
        game.build_level();
        game.state.start();
        game
    }

    fn build_level(&mut self) {
        self.vehicles.clear();
        let spacing = (ARENA_WIDTH / 3.0).floor();
        for lane in LANES {
            for i in 0..VEHICLES_PER_LANE {
                let vehicle = Entity::new(
                    self.ids.next_id(),
                    EntityKind::Vehicle,
                    Vec2::new(i as f32 * spacing, lane.y),
                    Vec2::new(lane.vehicle_width, VEHICLE_HEIGHT),
                )
                .with_vel(Vec2::new(lane.speed, 0.0))
                .with_tag(lane.tag);
                self.vehicles.add(vehicle);
            }
        }

        if self.goals.is_empty() {
            for i in 0..GOAL_COUNT {
                let goal = Entity::new(
                    self.ids.next_id(),
                    EntityKind::GoalZone,
                    Vec2::new(GOAL_ORIGIN_X + i as f32 * GOAL_SPACING, GOAL_Y),
                    Vec2::new(GOAL_SIZE.0, GOAL_SIZE.1),
                );
                self.goals.add(goal);
            }
        }
    }

    fn reset_frog(&mut self) {
        self.frog.pos = self.frog_start;
    }

    /// Advance one tick. `command` is expected to come from a debounced decoder.
    pub fn step(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.begin_tick() {
            return events;
        }

        if let Some(direction) = Direction::from_command(command) {
            if !step_discrete(&mut self.frog, direction, HOP_DISTANCE, &self.bounds) {
                log::debug!("hop {:?} rejected at {:?}", direction, self.frog.pos);
            }
        }

        for vehicle in self.vehicles.iter_mut() {
            vehicle.pos.x += vehicle.vel.x;
            wrap_horizontal(vehicle, ARENA_WIDTH);
        }

        if any_collision(&self.frog, &self.vehicles) {
            if self.state.lose_life(&mut events) {
                return events;
            }
            self.reset_frog();
            return events;
        }

        // Only the first goal touched counts; an already filled goal does nothing
        let goal_id = query_collisions(&self.frog, &self.goals)
            .first()
            .filter(|goal| !goal.filled)
            .map(|goal| goal.id);
        if let Some(goal) = goal_id.and_then(|id| self.goals.get_mut(id)) {
            goal.filled = true;
            events.push(GameEvent::GoalFilled);
            self.state.add_score(GOAL_POINTS, &mut events);
            self.reset_frog();

            if self.goals.iter().all(|g| g.filled) {
                for goal in self.goals.iter_mut() {
                    goal.filled = false;
                }
                for vehicle in self.vehicles.iter_mut() {
                    vehicle.vel *= DIFFICULTY_FACTOR;
                }
                self.state.complete_level(&mut events);
            }
        }

        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn frog(&self) -> &Entity {
        &self.frog
    }

    pub fn vehicles(&self) -> &Group {
        &self.vehicles
    }

    pub fn goals(&self) -> &Group {
        &self.goals
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.goals
            .iter()
            .chain(self.vehicles.iter())
            .chain(std::iter::once(&self.frog))
    }
}

impl Default for CrossingGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{DecoderPolicy, GestureCommandDecoder, GestureSample};
    use crate::sim::state::GamePhase;

    fn clear_traffic(game: &mut CrossingGame) {
        game.vehicles.clear();
    }

    /// Hop straight up until a goal is filled or the top edge stops the frog
    fn hop_to_top(game: &mut CrossingGame) {
        for _ in 0..20 {
            let before = game.frog().pos;
            let events = game.step(Command::Up);
            if events.contains(&GameEvent::GoalFilled) || game.frog().pos == before {
                break;
            }
        }
    }

    #[test]
    fn test_setup() {
        let game = CrossingGame::new();
        assert_eq!(game.vehicles().len(), LANES.len() * VEHICLES_PER_LANE);
        assert_eq!(game.goals().len(), GOAL_COUNT);
        assert!(!any_collision(game.frog(), game.vehicles()));
    }

    #[test]
    fn test_hop_is_exactly_one_step() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);
        let start = game.frog().pos;
        game.step(Command::Up);
        assert_eq!(game.frog().pos, start - Vec2::new(0.0, HOP_DISTANCE));
        game.step(Command::None);
        assert_eq!(game.frog().pos, start - Vec2::new(0.0, HOP_DISTANCE));
    }

    #[test]
    fn test_hop_off_screen_rejected() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);
        let start = game.frog().pos;
        game.step(Command::Down);
        assert_eq!(game.frog().pos, start);
    }

    #[test]
    fn test_held_gesture_moves_frog_once() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);
        let mut decoder = GestureCommandDecoder::new(DecoderPolicy::Debounced);
        let start = game.frog().pos;
        for _ in 0..60 {
            let command = decoder.decode(Some(GestureSample::hand(2)));
            game.step(command);
        }
        assert_eq!(game.frog().pos, start - Vec2::new(HOP_DISTANCE, 0.0));
    }

    #[test]
    fn test_vehicle_hit_resets_frog() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);
        let pos = game.frog().pos;
        let car = Entity::new(
            900,
            EntityKind::Vehicle,
            pos - Vec2::new(10.0, 0.0),
            Vec2::new(80.0, 35.0),
        )
        .with_vel(Vec2::new(3.0, 0.0));
        game.vehicles.add(car);
        game.step(Command::None);
        assert_eq!(game.state().lives, 2);
        assert_eq!(game.state().phase, GamePhase::LifeLost);
        assert_eq!(game.frog().pos, game.frog_start);
    }

    #[test]
    fn test_vehicles_wrap_and_stay_in_lane() {
        let mut game = CrossingGame::new();
        game.frog.pos = Vec2::new(0.0, 700.0);
        for _ in 0..2000 {
            game.step(Command::None);
        }
        for vehicle in game.vehicles() {
            assert!(vehicle.right() >= 0.0 - vehicle.vel.x.abs());
            assert!(vehicle.left() <= ARENA_WIDTH + vehicle.vel.x.abs());
            assert!(LANES.iter().any(|lane| lane.y == vehicle.pos.y));
        }
    }

    #[test]
    fn test_goal_fill_and_level_up() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);

        let goal_xs: Vec<f32> = game.goals().iter().map(|g| g.pos.x).collect();
        for (n, goal_x) in goal_xs.iter().enumerate() {
            // Walk sideways to line up under the goal, then climb
            game.frog.pos.x = goal_x + 20.0;
            hop_to_top(&mut game);
            assert_eq!(game.frog().pos, game.frog_start, "goal {n}");
            if n + 1 < GOAL_COUNT {
                assert_eq!(game.goals().iter().filter(|g| g.filled).count(), n + 1);
                assert_eq!(game.state().level, 1);
            }
        }

        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().score, GOAL_POINTS as u64 * GOAL_COUNT as u64);
        assert!(game.goals().iter().all(|g| !g.filled));
    }

    #[test]
    fn test_filled_goal_does_not_score_twice() {
        let mut game = CrossingGame::new();
        clear_traffic(&mut game);
        let goal_x = game.goals().iter().next().map(|g| g.pos.x).unwrap_or_default();
        game.frog.pos.x = goal_x + 20.0;
        hop_to_top(&mut game);
        assert_eq!(game.state().score, GOAL_POINTS as u64);
        game.frog.pos.x = goal_x + 20.0;
        hop_to_top(&mut game);
        assert_eq!(game.state().score, GOAL_POINTS as u64);
    }

    #[test]
    fn test_level_up_speeds_traffic() {
        let mut game = CrossingGame::new();
        let before: Vec<f32> = game.vehicles().iter().map(|v| v.vel.x).collect();
        game.vehicles.clear();
        for goal in game.goals.iter_mut().skip(1) {
            goal.filled = true;
        }
        // Same speeds, parked in the HUD strip where the frog never goes
        for (i, speed) in before.iter().enumerate() {
            let car = Entity::new(
                2000 + i as u32,
                EntityKind::Vehicle,
                Vec2::new(-5000.0, 0.0),
                Vec2::ONE,
            )
            .with_vel(Vec2::new(*speed, 0.0));
            game.vehicles.add(car);
        }
        let goal_x = game.goals().iter().next().map(|g| g.pos.x).unwrap_or_default();
        game.frog.pos.x = goal_x + 20.0;
        hop_to_top(&mut game);
        assert_eq!(game.state().level, 2);
        for (v, old) in game.vehicles().iter().zip(before) {
            assert!((v.vel.x - old * DIFFICULTY_FACTOR).abs() < 1e-4);
        }
    }
}
