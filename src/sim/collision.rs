//! Collision detection and per-tick damage resolution
//!
//! Geometry is plain axis-aligned boxes in pixel space. Resolution runs after
//! movement, bombs and enemies have all been advanced for the tick.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::bomb::BombSystem;
use super::state::{DamageCause, GameEvent, GameState};
use super::tilemap::{TileKind, TileMap};
use crate::consts::TILE;
use crate::pixel_to_tile;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        Self {
            min: center - Vec2::splat(half_extent),
            max: center + Vec2::splat(half_extent),
        }
    }

    /// Full cell of a tile
    pub fn tile(tile: IVec2) -> Self {
        let min = tile.as_vec2() * TILE;
        Self {
            min,
            max: min + Vec2::splat(TILE),
        }
    }

    /// Interiors intersect (shared edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Boxes intersect or share an edge
    pub fn touches(&self, other: &Rect) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }
}

/// True if the box overlaps any blocking tile
pub fn rect_vs_blocking(rect: &Rect, map: &TileMap, bombs: &BombSystem) -> bool {
    let lo = pixel_to_tile(rect.min);
    let hi = pixel_to_tile(rect.max);
    for tx in lo.x..=hi.x {
        for ty in lo.y..=hi.y {
            let tile = IVec2::new(tx, ty);
            if map.blocking(tile, bombs) && rect.overlaps(&Rect::tile(tile)) {
                return true;
            }
        }
    }
    false
}

/// Apply pickups, flame damage and enemy contact to the player
pub fn resolve(state: &mut GameState) {
    if !state.player.alive {
        return;
    }
    let tile = state.player.tile();

    let kind = state.map.kind(tile);
    if kind.is_powerup() {
        state.map.set(tile, TileKind::Empty);
        let player = &mut state.player;
        match kind {
            TileKind::PowerupBomb => {
                player.bomb_capacity =
                    player.bomb_capacity.saturating_add(1).min(state.tuning.max_bombs);
            }
            TileKind::PowerupFire => {
                player.power = player.power.saturating_add(1).min(state.tuning.max_power);
            }
            _ => {}
        }
        state.events.push(GameEvent::PickedUp { tile, kind });
    }

    if state.player.invulnerable_ticks > 0 {
        state.player.invulnerable_ticks -= 1;
    } else if state.bombs.in_flame(tile) {
        damage_player(state, DamageCause::Flame);
    }

    if state.player.invulnerable_ticks == 0 {
        let player_rect = state.player.rect();
        let touched = state
            .enemies
            .iter()
            .any(|e| e.alive && e.rect().touches(&player_rect));
        if touched {
            damage_player(state, DamageCause::Enemy);
        }
    }
}

fn damage_player(state: &mut GameState, cause: DamageCause) {
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.invulnerable_ticks = state.tuning.invulnerable_ticks;
    player.respawn();
    if player.lives == 0 {
        player.alive = false;
    }
    log::debug!("Player hit by {:?}, {} lives left", cause, player.lives);
    state.events.push(GameEvent::PlayerDamaged {
        cause,
        lives_left: player.lives,
    });
}
