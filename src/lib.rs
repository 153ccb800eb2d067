//! Grid Bomber - A Bomberman-style grid arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile map, movement, bombs, enemies, collisions)
//! - `session`: Stage progression, pause/restart, event dispatch
//! - `input`: Logical input actions merged from any number of backends
//! - `audio`: Sound-cue sink
//! - `renderer`: Read-only render view and a text renderer
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod input;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Session, SessionPhase};
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Max simulation steps per frame (spiral of death protection)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the session will catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tile edge length in pixels
    pub const TILE: f32 = 16.0;
    /// Grid dimensions in tiles
    pub const GRID_W: i32 = 13;
    pub const GRID_H: i32 = 11;

    /// Bomb fuse (2 seconds)
    pub const BOMB_FUSE_TICKS: u32 = TICK_RATE * 2;
    /// Flame lifetime (0.35 seconds)
    pub const FLAME_TICKS: u32 = 21;
    /// Damage immunity after losing a life (1 second)
    pub const INVULNERABLE_TICKS: u32 = TICK_RATE;

    /// Player grid-step speed: one tile in 8 ticks
    pub const PLAYER_STEP_SPEED: f32 = 2.0;
    pub const ENEMY_SPEED: f32 = 1.2;
    /// Half edge of the 12x12 actor bounding box
    pub const ACTOR_HALF_EXTENT: f32 = 6.0;

    pub const MAX_ENEMIES: usize = 6;
    pub const INITIAL_LIVES: u8 = 3;
    pub const INITIAL_BOMBS: u8 = 1;
    pub const INITIAL_POWER: u8 = 2;
    pub const MAX_BOMBS_CAP: u8 = 8;
    pub const MAX_POWER_CAP: u8 = 8;

    /// Chance a destructible turns into a tile at generation
    pub const DESTRUCTIBLE_DENSITY: f64 = 0.70;
    /// Cumulative powerup drop thresholds for a destroyed destructible
    pub const DROP_BOMB_BELOW: f64 = 0.06;
    pub const DROP_FIRE_BELOW: f64 = 0.12;

    /// Enemy direction persistence
    pub const ENEMY_KEEP_DIRECTION: f64 = 0.7;

    /// Centering tolerance in pixels
    pub const PLAYER_CENTER_EPSILON: f32 = 0.5;
    pub const ENEMY_CENTER_EPSILON: f32 = 1.0;

    /// Stage seed base and stride
    pub const SEED_BASE: u64 = 1337;
    pub const SEED_STRIDE: u64 = 97;
}

/// Player spawn tile
pub const SPAWN_TILE: IVec2 = IVec2::new(1, 1);

/// Seed used for a given stage number
#[inline]
pub fn stage_seed(stage: u32) -> u64 {
    consts::SEED_BASE + stage as u64 * consts::SEED_STRIDE
}

/// Pixel center of a tile
#[inline]
pub fn tile_center(tile: IVec2) -> Vec2 {
    let half = consts::TILE / 2.0;
    Vec2::new(
        tile.x as f32 * consts::TILE + half,
        tile.y as f32 * consts::TILE + half,
    )
}

/// Tile containing a pixel position
#[inline]
pub fn pixel_to_tile(pos: Vec2) -> IVec2 {
    IVec2::new(
        (pos.x / consts::TILE).floor() as i32,
        (pos.y / consts::TILE).floor() as i32,
    )
}

/// Check whether a tile coordinate lies on the grid
#[inline]
pub fn in_bounds(tile: IVec2) -> bool {
    tile.x >= 0 && tile.y >= 0 && tile.x < consts::GRID_W && tile.y < consts::GRID_H
}
