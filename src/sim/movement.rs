//! Grid-step movement
//!
//! An actor at rest on a tile center may commit to a one-tile step; while
//! stepping it slides along a single axis toward the target center and snaps
//! onto it on arrival. Steps are never diagonal and never start toward a
//! blocking tile.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::bomb::BombSystem;
use super::collision::Rect;
use super::tilemap::TileMap;
use crate::consts::{ACTOR_HALF_EXTENT, PLAYER_CENTER_EPSILON};
use crate::{in_bounds, pixel_to_tile, tile_center};

/// Cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order for input priority and AI neighbor scans
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Tile offset (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Unit pixel vector
    pub fn unit(self) -> Vec2 {
        self.delta().as_vec2()
    }
}

/// Step state machine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum StepState {
    #[default]
    AtRest,
    Stepping { direction: Direction, target: Vec2 },
}

/// Drives one grid-bound actor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementController {
    pub state: StepState,
    /// Direction of the current or last continued step, cleared when idle
    pub heading: Option<Direction>,
    /// Bomb tile this actor may still walk through (its own fresh bomb)
    pub pass_tile: Option<IVec2>,
}

impl MovementController {
    pub fn is_stepping(&self) -> bool {
        matches!(self.state, StepState::Stepping { .. })
    }

    /// Back to rest with no step in flight (respawn/stage reset)
    pub fn reset(&mut self) {
        self.state = StepState::AtRest;
        self.heading = None;
        self.pass_tile = None;
    }

    /// Exempt a freshly placed bomb tile from the blocking check
    pub fn grant_pass_through(&mut self, tile: IVec2) {
        self.pass_tile = Some(tile);
    }

    /// Whether a step onto `tile` may be committed
    fn can_enter(&self, tile: IVec2, map: &TileMap, bombs: &BombSystem) -> bool {
        if !in_bounds(tile) || map.obstructed(tile) {
            return false;
        }
        bombs.bomb_at(tile).is_none() || self.pass_tile == Some(tile)
    }

    fn try_start(
        &mut self,
        pos: Vec2,
        direction: Option<Direction>,
        map: &TileMap,
        bombs: &BombSystem,
    ) -> bool {
        let Some(direction) = direction else {
            return false;
        };
        let next = pixel_to_tile(pos) + direction.delta();
        if !self.can_enter(next, map, bombs) {
            return false;
        }
        self.state = StepState::Stepping {
            direction,
            target: tile_center(next),
        };
        self.heading = Some(direction);
        true
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        pos: &mut Vec2,
        requested: Option<Direction>,
        speed: f32,
        map: &TileMap,
        bombs: &BombSystem,
    ) {
        // Pass-through ends once the actor no longer overlaps the bomb tile
        if let Some(tile) = self.pass_tile {
            if !Rect::around(*pos, ACTOR_HALF_EXTENT).overlaps(&Rect::tile(tile)) {
                self.pass_tile = None;
            }
        }

        let center = tile_center(pixel_to_tile(*pos));
        let delta = (*pos - center).abs();
        let at_center = delta.x < PLAYER_CENTER_EPSILON && delta.y < PLAYER_CENTER_EPSILON;
        if at_center {
            *pos = center;
        }

        if self.state == StepState::AtRest && at_center {
            self.try_start(*pos, requested, map, bombs);
        }

        if let StepState::Stepping { direction, target } = self.state {
            let unit = direction.unit();
            let next = *pos + unit * speed;
            if (target - next).dot(unit) <= 0.0 {
                *pos = target;
                self.state = StepState::AtRest;
                // Same direction keeps walking, a new one turns the corner
                if !self.try_start(*pos, requested, map, bombs) {
                    self.heading = None;
                }
            } else {
                *pos = next;
            }
        }
    }
}
