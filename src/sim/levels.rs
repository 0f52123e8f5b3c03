//! Fixed level tables
//!
//! Layout data only; each variant turns these into entities during setup.

/// Maze cell codes
pub const WALL: u8 = 1;
pub const PELLET: u8 = 2;
pub const POWER_PELLET: u8 = 3;

/// Maze layout (1 = wall, 0 = empty path, 2 = pellet, 3 = power pellet)
pub const MAZE: [[u8; 16]; 13] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 3, 1, 1, 2, 1, 2, 1, 1, 2, 1, 2, 1, 1, 3, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 2, 1, 2, 2, 2, 2, 1, 2, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 3, 1, 1, 2, 1, 2, 1, 1, 2, 1, 2, 1, 1, 3, 1],
    [1, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

pub const MAZE_CELL_WIDTH: f32 = 60.0;
pub const MAZE_CELL_HEIGHT: f32 = 50.0;
pub const MAZE_OFFSET_Y: f32 = 100.0;
/// Player start cell (col, row)
pub const MAZE_PLAYER_CELL: (usize, usize) = (8, 9);
/// Ghost pen cells (col, row); all on the open corridor of row 6
pub const MAZE_GHOST_CELLS: [(usize, usize); 4] = [(6, 6), (7, 6), (8, 6), (9, 6)];

/// Brick rows, top to bottom: (colour tag, points)
pub const BRICK_ROWS: [(u8, u32); 5] = [(0, 50), (1, 40), (2, 30), (3, 20), (4, 10)];
pub const BRICK_COLUMNS: usize = 12;
pub const BRICK_WIDTH: f32 = 70.0;
pub const BRICK_HEIGHT: f32 = 25.0;
pub const BRICK_ORIGIN: (f32, f32) = (80.0, 100.0);
pub const BRICK_SPACING: (f32, f32) = (80.0, 35.0);

/// A traffic lane
#[derive(Debug, Clone, Copy)]
pub struct Lane {
    pub y: f32,
    /// Units per tick, sign gives direction
    pub speed: f32,
    pub tag: u8,
    pub vehicle_width: f32,
}

pub const LANES: [Lane; 5] = [
    Lane { y: 150.0, speed: 3.0, tag: 0, vehicle_width: 80.0 },
    Lane { y: 210.0, speed: -4.0, tag: 1, vehicle_width: 100.0 },
    Lane { y: 270.0, speed: 5.0, tag: 2, vehicle_width: 70.0 },
    Lane { y: 330.0, speed: -3.0, tag: 3, vehicle_width: 90.0 },
    Lane { y: 390.0, speed: 4.0, tag: 4, vehicle_width: 85.0 },
];
pub const VEHICLES_PER_LANE: usize = 4;
pub const VEHICLE_HEIGHT: f32 = 35.0;

pub const GOAL_COUNT: usize = 5;
pub const GOAL_Y: f32 = 80.0;
pub const GOAL_SIZE: (f32, f32) = (80.0, 50.0);
pub const GOAL_ORIGIN_X: f32 = 100.0;
pub const GOAL_SPACING: f32 = 200.0;

/// Alien formation rows, top to bottom: (colour tag, points)
pub const ALIEN_ROWS: [(u8, u32); 5] = [(0, 30), (2, 20), (2, 20), (3, 10), (3, 10)];
pub const ALIEN_COLUMNS: usize = 10;
pub const ALIEN_SIZE: (f32, f32) = (40.0, 30.0);
pub const ALIEN_ORIGIN: (f32, f32) = (50.0, 50.0);
pub const ALIEN_SPACING: (f32, f32) = (60.0, 50.0);

/// Colour for each entity tag (RGB), for frontends
pub const COLORS: [u32; 5] = [0xFF0000, 0xFF8000, 0xFFFF00, 0x00FF00, 0x00FFFF];
