//! Brick breaker: keep the ball in play with the paddle and clear the wall.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::difficulty_scale;
use crate::gesture::Command;
use crate::sim::collision::{clamp_horizontal, take_collisions};
use crate::sim::entity::{Entity, EntityKind, Group, IdAllocator};
use crate::sim::levels::{
    BRICK_COLUMNS, BRICK_HEIGHT, BRICK_ORIGIN, BRICK_ROWS, BRICK_SPACING, BRICK_WIDTH,
};
use crate::sim::state::{GameEvent, GameState};

pub const PADDLE_SIZE: Vec2 = Vec2::new(120.0, 20.0);
pub const PADDLE_SPEED: f32 = 12.0;
pub const BALL_SIZE: f32 = 16.0;
/// Launch speed (horizontal magnitude, vertical upward)
pub const BALL_SPEED_X: f32 = 5.0;
pub const BALL_SPEED_Y: f32 = 6.0;
pub const BALL_MAX_SPEED: f32 = 10.0;
/// The HUD strip above this line acts as the ceiling
pub const CEILING_Y: f32 = 60.0;
/// Horizontal speed range produced by paddle hits (±half of this)
pub const PADDLE_DEFLECTION: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct BreakoutGame {
    state: GameState,
    rng: Pcg32,
    ids: IdAllocator,
    paddle: Entity,
    ball: Entity,
    bricks: Group,
}

impl BreakoutGame {
    pub fn new(seed: u64) -> Self {
        let mut ids = IdAllocator::default();
        let paddle = Entity::new(
            ids.next_id(),
            EntityKind::Paddle,
            Vec2::new(ARENA_WIDTH / 2.0 - PADDLE_SIZE.x / 2.0, ARENA_HEIGHT - 50.0),
            PADDLE_SIZE,
        );
        let ball = Entity::new(ids.next_id(), EntityKind::Ball, Vec2::ZERO, Vec2::splat(BALL_SIZE));

        let mut game = Self {
            state: GameState::new(),
            rng: Pcg32::seed_from_u64(seed),
            ids,
            paddle,
            ball,
            bricks: Group::new(),
        };
        game.build_bricks();
        game.serve_ball();
        game.state.start();
        game
    }

    fn build_bricks(&mut self) {
        self.bricks.clear();
        for (row, &(tag, points)) in BRICK_ROWS.iter().enumerate() {
            for col in 0..BRICK_COLUMNS {
                let pos = Vec2::new(
                    BRICK_ORIGIN.0 + col as f32 * BRICK_SPACING.0,
                    BRICK_ORIGIN.1 + row as f32 * BRICK_SPACING.1,
                );
                let brick = Entity::new(
                    self.ids.next_id(),
                    EntityKind::Brick,
                    pos,
                    Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
                )
                .with_points(points)
                .with_tag(tag);
                self.bricks.add(brick);
            }
        }
    }

    /// New ball from the centre of the screen, heading up at a random side
    fn serve_ball(&mut self) {
        let vx = if self.rng.random_bool(0.5) {
            BALL_SPEED_X
        } else {
            -BALL_SPEED_X
        };
        let vy = (BALL_SPEED_Y * difficulty_scale(self.state.level)).min(BALL_MAX_SPEED);
        self.ball.pos = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        self.ball.vel = Vec2::new(vx, -vy);
    }

    pub fn step(&mut self, command: Command) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.state.begin_tick() {
            return events;
        }

        // Paddle
        match command {
            Command::Left => self.paddle.pos.x -= PADDLE_SPEED,
            Command::Right => self.paddle.pos.x += PADDLE_SPEED,
            _ => {}
        }
        clamp_horizontal(&mut self.paddle, ARENA_WIDTH);

        // Ball flight and wall bounces
        let ball = &mut self.ball;
        ball.pos += ball.vel;
        if (ball.left() <= 0.0 && ball.vel.x < 0.0)
            || (ball.right() >= ARENA_WIDTH && ball.vel.x > 0.0)
        {
            ball.vel.x = -ball.vel.x;
        }
        if ball.top() <= CEILING_Y && ball.vel.y < 0.0 {
            ball.vel.y = -ball.vel.y;
        }

        // Paddle rebound, skewed by where the ball met the paddle
        if self.ball.collides(&self.paddle) && self.ball.vel.y > 0.0 {
            self.ball.vel.y = -self.ball.vel.y;
            let offset = self.ball.center().x - self.paddle.left();
            let hit = (offset / self.paddle.size.x).clamp(0.0, 1.0);
            self.ball.vel.x = (hit - 0.5) * PADDLE_DEFLECTION;
        }

        // Bricks
        let hits = take_collisions(&self.ball, &mut self.bricks);
        if !hits.is_empty() {
            self.ball.vel.y = -self.ball.vel.y;
            for brick in &hits {
                self.state.add_score(brick.points, &mut events);
            }
        }

        // Ball lost
        if self.ball.top() > ARENA_HEIGHT {
            if self.state.lose_life(&mut events) {
                return events;
            }
            self.serve_ball();
        }

        if self.bricks.is_empty() {
            self.state.complete_level(&mut events);
            self.build_bricks();
            self.serve_ball();
        }

        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn paddle(&self) -> &Entity {
        &self.paddle
    }

    pub fn ball(&self) -> &Entity {
        &self.ball
    }

    pub fn bricks(&self) -> &Group {
        &self.bricks
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.bricks
            .iter()
            .chain([&self.paddle, &self.ball])
    }
}
