//! Maze chase: steer through the maze eating pellets while ghosts wander.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::ARENA_WIDTH;
use crate::difficulty_scale;
use crate::gesture::Command;
use crate::sim::collision::{Direction, any_collision, move_continuous, take_collisions};
use crate::sim::entity::{Entity, EntityKind, Group, IdAllocator};
use crate::sim::levels::{
    MAZE, MAZE_CELL_HEIGHT, MAZE_CELL_WIDTH, MAZE_GHOST_CELLS, MAZE_OFFSET_Y, MAZE_PLAYER_CELL,
    PELLET, POWER_PELLET, WALL,
};
use crate::sim::state::{GameEvent, GameState};

pub const PLAYER_SIZE: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 4.0;
pub const GHOST_SIZE: f32 = 30.0;
pub const GHOST_SPEED: f32 = 2.0;
/// Ghosts pick a new heading after this many ticks
pub const GHOST_WANDER_TICKS: u32 = 60;
pub const PELLET_SIZE: f32 = 6.0;
pub const POWER_PELLET_SIZE: f32 = 16.0;
pub const PELLET_POINTS: u32 = 10;
pub const POWER_PELLET_POINTS: u32 = 50;

/// Maze chase session
#[derive(Debug, Clone)]
pub struct MazeGame {
    state: GameState,
    rng: Pcg32,
    ids: IdAllocator,
    walls: Group,
    pellets: Group,
    ghosts: Group,
    player: Entity,
    player_start: Vec2,
    direction: Direction,
}

fn maze_offset_x() -> f32 {
    ((ARENA_WIDTH - MAZE[0].len() as f32 * MAZE_CELL_WIDTH) / 2.0).floor()
}

fn cell_origin(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        maze_offset_x() + col as f32 * MAZE_CELL_WIDTH,
        MAZE_OFFSET_Y + row as f32 * MAZE_CELL_HEIGHT,
    )
}

impl MazeGame {
    pub fn new(seed: u64) -> Self {
        let (col, row) = MAZE_PLAYER_CELL;
        let player_start = cell_origin(col, row);
        let mut ids = IdAllocator::default();
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
            walls: Group::new(),
            pellets: Group::new(),
            ghosts: Group::new(),
            player,
            player_start,
            direction: Direction::Right,
        };
        game.build_level();
        game.state.start();
        game
    }

    /// Rebuild walls, pellets and ghosts for the current level
    fn build_level(&mut self) {
        self.walls.clear();
        self.pellets.clear();
        self.ghosts.clear();

        for (row_idx, row) in MAZE.iter().enumerate() {
            for (col_idx, &cell) in row.iter().enumerate() {
                let origin = cell_origin(col_idx, row_idx);
                let cell_size = Vec2::new(MAZE_CELL_WIDTH, MAZE_CELL_HEIGHT);
                match cell {
                    WALL => self.walls.add(Entity::new(
                        self.ids.next_id(),
                        EntityKind::Wall,
                        origin,
                        cell_size,
                    )),
                    PELLET | POWER_PELLET => {
                        let power = cell == POWER_PELLET;
                        let (size, points) = if power {
                            (POWER_PELLET_SIZE, POWER_PELLET_POINTS)
                        } else {
                            (PELLET_SIZE, PELLET_POINTS)
                        };
                        let pos = origin + (cell_size - Vec2::splat(size)) * 0.5;
                        let mut pellet = Entity::new(
                            self.ids.next_id(),
                            EntityKind::Pellet,
                            pos.floor(),
                            Vec2::splat(size),
                        )
                        .with_points(points);
                        pellet.filled = power;
                        self.pellets.add(pellet);
                    }
                    _ => {}
                }
            }
        }

        let speed = GHOST_SPEED * difficulty_scale(self.state.level);
        for (i, &(col, row)) in MAZE_GHOST_CELLS.iter().enumerate() {
            let direction = Direction::ALL[self.rng.random_range(0..4)];
            let ghost = Entity::new(
                self.ids.next_id(),
                EntityKind::Ghost,
                cell_origin(col, row),
                Vec2::splat(GHOST_SIZE),
            )
            .with_vel(direction.unit() * speed)
            .with_tag(i as u8);
            self.ghosts.add(ghost);
        }

        self.respawn_player();
        log::debug!(
            "maze level {} built: {} walls, {} pellets, ghost speed {:.2}",
            self.state.level,
            self.walls.len(),
            self.pellets.len(),
            speed
        );
    }

    fn respawn_player(&mut self) {
        self.player.pos = self.player_start;
    }

    /// Advance one tick
    pub fn step(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.begin_tick() {
            return events;
        }

        if let Some(direction) = Direction::from_command(command) {
            self.direction = direction;
        }

        // Movement
        let delta = self.direction.unit() * PLAYER_SPEED;
        move_continuous(&mut self.player, delta, &self.walls);
        self.move_ghosts();

        // Collectibles
        for pellet in take_collisions(&self.player, &mut self.pellets) {
            self.state.add_score(pellet.points, &mut events);
        }

        // Death
        if any_collision(&self.player, &self.ghosts) {
            if self.state.lose_life(&mut events) {
                return events;
            }
            self.respawn_player();
        }

        if self.pellets.is_empty() {
            self.state.complete_level(&mut events);
            self.build_level();
        }

        events
    }

    /// Wander: re-roll heading on a timer, and whenever a wall blocks the move
    fn move_ghosts(&mut self) {
        let speed = GHOST_SPEED * difficulty_scale(self.state.level);
        for ghost in self.ghosts.iter_mut() {
            ghost.timer += 1;
            if ghost.timer > GHOST_WANDER_TICKS {
                ghost.vel = Direction::ALL[self.rng.random_range(0..4)].unit() * speed;
                ghost.timer = 0;
            }

            let delta = ghost.vel;
            if move_continuous(ghost, delta, &self.walls) {
                ghost.vel = Direction::ALL[self.rng.random_range(0..4)].unit() * speed;
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn walls(&self) -> &Group {
        &self.walls
    }

    pub fn pellets(&self) -> &Group {
        &self.pellets
    }

    pub fn ghosts(&self) -> &Group {
        &self.ghosts
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.walls
            .iter()
            .chain(self.pellets.iter())
            .chain(self.ghosts.iter())
            .chain(std::iter::once(&self.player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    /// Park every ghost far away so tests control collisions
    fn without_ghosts(game: &mut MazeGame) {
        game.ghosts.clear();
    }

    #[test]
    fn test_setup_builds_maze() {
        let game = MazeGame::new(1);
        let pellet_cells = MAZE.iter().flatten().filter(|c| **c == PELLET).count();
        let power_cells = MAZE.iter().flatten().filter(|c| **c == POWER_PELLET).count();
        assert_eq!(game.pellets().len(), pellet_cells + power_cells);
        assert_eq!(game.ghosts().len(), 4);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert!(!any_collision(game.player(), game.walls()));
        for ghost in game.ghosts() {
            assert!(!any_collision(ghost, game.walls()));
        }
    }

    #[test]
    fn test_command_sets_direction_and_none_keeps_it() {
        let mut game = MazeGame::new(1);
        without_ghosts(&mut game);
        game.step(Command::Left);
        assert_eq!(game.direction(), Direction::Left);
        game.step(Command::None);
        game.step(Command::Action);
        assert_eq!(game.direction(), Direction::Left);
    }

    #[test]
    fn test_player_never_enters_walls() {
        let mut game = MazeGame::new(3);
        without_ghosts(&mut game);
        let commands = [Command::Up, Command::Left, Command::Down, Command::Right];
        for tick in 0..600 {
            let before = game.player().pos;
            game.step(commands[(tick / 45) % 4]);
            assert!(!any_collision(game.player(), game.walls()));
            let moved = game.player().pos - before;
            assert!(moved == Vec2::ZERO || moved.length() == PLAYER_SPEED);
        }
    }

    #[test]
    fn test_eating_pellets_scores_monotonically() {
        let mut game = MazeGame::new(5);
        without_ghosts(&mut game);
        let mut last = 0;
        for _ in 0..120 {
            game.step(Command::Left);
            assert!(game.state().score >= last);
            last = game.state().score;
        }
        assert!(last > 0);
        assert_eq!(last % PELLET_POINTS as u64, 0);
    }

    #[test]
    fn test_ghost_touch_costs_life_and_respawns() {
        let mut game = MazeGame::new(1);
        without_ghosts(&mut game);
        game.step(Command::Left);
        game.step(Command::Left);
        let pos = game.player().pos;
        let ghost = Entity::new(999, EntityKind::Ghost, pos, Vec2::splat(GHOST_SIZE));
        game.ghosts.add(ghost);

        game.step(Command::None);
        assert_eq!(game.state().lives, 2);
        assert_eq!(game.state().phase, GamePhase::LifeLost);
        assert_eq!(game.player().pos, game.player_start);
    }

    #[test]
    fn test_clearing_pellets_advances_level() {
        let mut game = MazeGame::new(1);
        without_ghosts(&mut game);
        game.pellets.clear();
        let pos = game.player().pos;
        game.pellets.add(
            Entity::new(500, EntityKind::Pellet, pos + Vec2::new(2.0, 2.0), Vec2::splat(6.0))
                .with_points(PELLET_POINTS),
        );

        game.step(Command::None);
        assert_eq!(game.state().phase, GamePhase::LevelComplete);
        assert_eq!(game.state().level, 2);
        assert!(!game.pellets().is_empty());
        let expected = GHOST_SPEED * crate::consts::DIFFICULTY_FACTOR;
        for ghost in game.ghosts() {
            assert!((ghost.vel.length() - expected).abs() < 1e-4);
        }

        game.step(Command::None);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_ghosts_stay_out_of_walls() {
        let mut game = MazeGame::new(11);
        game.state.lives = u32::MAX;
        for _ in 0..1000 {
            game.step(Command::None);
            for ghost in game.ghosts() {
                assert!(!any_collision(ghost, game.walls()));
            }
        }
    }

    /// Replace the ghosts with one ghost at `pos` heading along `vel`
    fn lone_ghost(game: &mut MazeGame, pos: Vec2, vel: Vec2, timer: u32) {
        game.ghosts.clear();
        let mut ghost =
            Entity::new(900, EntityKind::Ghost, pos, Vec2::splat(GHOST_SIZE)).with_vel(vel);
        ghost.timer = timer;
        game.ghosts.add(ghost);
    }

    #[test]
    fn test_blocked_ghost_rolls_back_and_rerolls() {
        let mut game = MazeGame::new(7);
        game.walls.clear();
        game.walls.add(Entity::new(
            800,
            EntityKind::Wall,
            Vec2::new(100.0, 100.0),
            Vec2::new(MAZE_CELL_WIDTH, MAZE_CELL_HEIGHT),
        ));
        // Flush against the wall's right edge, heading into it
        let start = Vec2::new(100.0 + MAZE_CELL_WIDTH, 110.0);
        lone_ghost(&mut game, start, Vec2::new(-GHOST_SPEED, 0.0), 0);

        let mut expected = game.rng.clone();
        game.move_ghosts();

        let ghost = &game.ghosts.as_slice()[0];
        assert_eq!(ghost.pos, start);
        assert_eq!(ghost.timer, 1);
        let heading = Direction::ALL[expected.random_range(0..4)];
        assert_eq!(ghost.vel, heading.unit() * GHOST_SPEED);
        assert_eq!(game.rng, expected);
    }

    #[test]
    fn test_ghost_rerolls_after_sixty_ticks() {
        let mut game = MazeGame::new(9);
        game.walls.clear();
        let vel = Vec2::new(GHOST_SPEED, 0.0);
        lone_ghost(&mut game, Vec2::new(400.0, 400.0), vel, GHOST_WANDER_TICKS - 1);

        // Tick 60: same heading, no draw
        let untouched = game.rng.clone();
        game.move_ghosts();
        let ghost = &game.ghosts.as_slice()[0];
        assert_eq!(ghost.timer, GHOST_WANDER_TICKS);
        assert_eq!(ghost.vel, vel);
        assert_eq!(ghost.pos, Vec2::new(400.0 + GHOST_SPEED, 400.0));
        assert_eq!(game.rng, untouched);

        // Tick 61: timer resets and a new heading is drawn
        let mut expected = game.rng.clone();
        let before = ghost.pos;
        game.move_ghosts();
        let ghost = &game.ghosts.as_slice()[0];
        let heading = Direction::ALL[expected.random_range(0..4)];
        assert_eq!(ghost.timer, 0);
        assert_eq!(ghost.vel, heading.unit() * GHOST_SPEED);
        assert_eq!(ghost.pos, before + ghost.vel);
        assert_eq!(game.rng, expected);
    }

    #[test]
    fn test_same_seed_same_ghost_paths() {
        let mut a = MazeGame::new(42);
        let mut b = MazeGame::new(42);
        for _ in 0..300 {
            a.step(Command::Up);
            b.step(Command::Up);
        }
        let pa: Vec<_> = a.ghosts().iter().map(|g| g.pos).collect();
        let pb: Vec<_> = b.ghosts().iter().map(|g| g.pos).collect();
        assert_eq!(pa, pb);
    }
}
