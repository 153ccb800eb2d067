//! Bombs, flames and chain reactions
//!
//! Bombs tick down their fuse and detonate into a single flame covering the
//! origin plus four cardinal rays. Any live bomb caught by a flame detonates in
//! the same pass, so a chain of any length resolves within one tick.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::movement::Direction;
use super::tilemap::{TileKind, TileMap};
use crate::Tuning;

/// Identifies the actor that placed a bomb
pub type ActorId = u32;

/// The (only) bomb-placing actor
pub const PLAYER_ID: ActorId = 0;

/// A live bomb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub tile: IVec2,
    /// Ticks left before detonation
    pub fuse: u32,
    /// Fuse length at placement
    pub fuse_total: u32,
    /// Blast radius in tiles
    pub power: u8,
    pub owner: ActorId,
}

impl Bomb {
    /// Remaining fuse as a fraction of the full fuse (1.0 = just placed)
    pub fn fuse_ratio(&self) -> f32 {
        if self.fuse_total == 0 {
            return 0.0;
        }
        self.fuse as f32 / self.fuse_total as f32
    }
}

/// Tiles scorched by one detonation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flame {
    pub origin: IVec2,
    pub tiles: Vec<IVec2>,
    /// Ticks left on the board
    pub ttl: u32,
}

impl Flame {
    pub fn covers(&self, tile: IVec2) -> bool {
        self.tiles.contains(&tile)
    }
}

/// Outcome of a single bomb going off
#[derive(Debug, Clone, PartialEq)]
pub struct Detonation {
    pub bomb: Bomb,
    /// Set when another blast triggered this bomb
    pub chained: bool,
    pub tiles: Vec<IVec2>,
    /// Destroyed destructibles and what each turned into
    pub destroyed: Vec<(IVec2, TileKind)>,
}

/// Owns live bombs and flames
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BombSystem {
    /// Live bombs in placement order
    bombs: Vec<Bomb>,
    flames: Vec<Flame>,
    next_id: u32,
}

impl BombSystem {
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn flames(&self) -> &[Flame] {
        &self.flames
    }

    pub fn bomb_at(&self, tile: IVec2) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.tile == tile)
    }

    /// Live bombs placed by `owner`
    pub fn owned_by(&self, owner: ActorId) -> usize {
        self.bombs.iter().filter(|b| b.owner == owner).count()
    }

    /// True if any live flame covers the tile
    pub fn in_flame(&self, tile: IVec2) -> bool {
        self.flames.iter().any(|f| f.covers(tile))
    }

    /// Place a bomb for `owner` at `tile`
    ///
    /// Refused (returns `None`) when the owner already has `capacity` live bombs,
    /// the tile is wall/destructible/out of bounds, or a bomb already sits there.
    pub fn place(
        &mut self,
        map: &TileMap,
        tile: IVec2,
        owner: ActorId,
        power: u8,
        capacity: u8,
        fuse_ticks: u32,
    ) -> Option<u32> {
        if self.owned_by(owner) >= capacity as usize {
            return None;
        }
        if map.obstructed(tile) || self.bomb_at(tile).is_some() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.bombs.push(Bomb {
            id,
            tile,
            fuse: fuse_ticks,
            fuse_total: fuse_ticks,
            power,
            owner,
        });
        Some(id)
    }

    /// Put a flame on the board without a bomb
    pub fn ignite(&mut self, origin: IVec2, tiles: Vec<IVec2>, ttl: u32) {
        self.flames.push(Flame { origin, tiles, ttl });
    }

    /// Advance one tick: age flames, burn fuses, resolve detonations
    ///
    /// Flames are aged before new ones are created so a fresh flame stays on the
    /// board for the full `flame_ticks`.
    pub fn update(
        &mut self,
        map: &mut TileMap,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> Vec<Detonation> {
        for flame in &mut self.flames {
            flame.ttl = flame.ttl.saturating_sub(1);
        }
        self.flames.retain(|f| f.ttl > 0);

        for bomb in &mut self.bombs {
            bomb.fuse = bomb.fuse.saturating_sub(1);
        }

        let mut detonations = Vec::new();
        // Re-scan after each chain: a cascade may have removed later entries
        while let Some(idx) = self.bombs.iter().position(|b| b.fuse == 0) {
            let bomb = self.bombs.remove(idx);
            detonations.extend(self.detonate(bomb, map, rng, tuning));
        }
        detonations
    }

    /// Detonate a bomb already removed from the live set, plus its whole chain
    pub fn detonate(
        &mut self,
        bomb: Bomb,
        map: &mut TileMap,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> Vec<Detonation> {
        let mut detonations = Vec::new();
        let mut pending = VecDeque::from([(bomb, false)]);

        while let Some((bomb, chained)) = pending.pop_front() {
            let tiles = blast_tiles(map, bomb.tile, bomb.power);

            let mut destroyed = Vec::new();
            for &tile in &tiles {
                if map.kind(tile) == TileKind::Destructible {
                    let drop = roll_drop(rng.random::<f64>(), tuning);
                    map.set(tile, drop);
                    destroyed.push((tile, drop));
                }
            }

            self.flames.push(Flame {
                origin: bomb.tile,
                tiles: tiles.clone(),
                ttl: tuning.flame_ticks,
            });

            // Caught bombs leave the live set now and go off in placement order
            let mut i = 0;
            while i < self.bombs.len() {
                if tiles.contains(&self.bombs[i].tile) {
                    pending.push_back((self.bombs.remove(i), true));
                } else {
                    i += 1;
                }
            }

            log::debug!(
                "Bomb {} at {} detonated (chained={}, {} tiles, {} destroyed)",
                bomb.id,
                bomb.tile,
                chained,
                tiles.len(),
                destroyed.len()
            );
            detonations.push(Detonation {
                bomb,
                chained,
                tiles,
                destroyed,
            });
        }

        if detonations.len() > 1 {
            log::debug!("Chain reaction of {} bombs", detonations.len());
        }
        detonations
    }
}

/// Tiles covered by a blast of `power` from `origin`
///
/// Each ray stops before a wall (excluded) or on a destructible (included).
pub fn blast_tiles(map: &TileMap, origin: IVec2, power: u8) -> Vec<IVec2> {
    let mut tiles = vec![origin];
    for direction in Direction::ALL {
        for dist in 1..=power as i32 {
            let tile = origin + direction.delta() * dist;
            if map.solid(tile) {
                break;
            }
            tiles.push(tile);
            if map.kind(tile) == TileKind::Destructible {
                break;
            }
        }
    }
    tiles
}

/// Map a drop roll in [0, 1) to exactly one outcome for a destroyed tile
pub fn roll_drop(roll: f64, tuning: &Tuning) -> TileKind {
    if roll < tuning.drop_bomb_below {
        TileKind::PowerupBomb
    } else if roll < tuning.drop_fire_below {
        TileKind::PowerupFire
    } else {
        TileKind::Empty
    }
}
