//! Terrain grid
//!
//! The grid is stored row-major. Walls form the border plus the even-coordinate
//! interior lattice and never change after generation; every other cell moves
//! between empty, destructible and the two powerup kinds.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bomb::BombSystem;
use crate::consts::{GRID_H, GRID_W};
use crate::{SPAWN_TILE, in_bounds};

/// Terrain kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
    Destructible,
    PowerupBomb,
    PowerupFire,
}

impl TileKind {
    pub fn is_powerup(self) -> bool {
        matches!(self, TileKind::PowerupBomb | TileKind::PowerupFire)
    }
}

/// Tiles kept free of destructibles around the player spawn (relative to spawn)
const SPAWN_CLEARING: [IVec2; 6] = [
    IVec2::new(0, 0),
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
    IVec2::new(2, 1),
    IVec2::new(1, 2),
];

/// Fixed-size terrain grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    cells: Vec<TileKind>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::walled()
    }
}

impl TileMap {
    /// Border and lattice walls only, every other cell empty
    pub fn walled() -> Self {
        let mut map = Self {
            width: GRID_W,
            height: GRID_H,
            cells: vec![TileKind::Empty; (GRID_W * GRID_H) as usize],
        };
        for y in 0..GRID_H {
            for x in 0..GRID_W {
                let tile = IVec2::new(x, y);
                if Self::is_wall_slot(tile) {
                    let idx = map.index(tile);
                    map.cells[idx] = TileKind::Wall;
                }
            }
        }
        map
    }

    /// Generate a stage map from the stage RNG
    ///
    /// Destructibles are drawn column by column (x-major) so the same seed always
    /// yields the same grid.
    pub fn generate(rng: &mut Pcg32, density: f64) -> Self {
        let mut map = Self::walled();
        for x in 0..GRID_W {
            for y in 0..GRID_H {
                let tile = IVec2::new(x, y);
                if map.kind(tile) != TileKind::Empty {
                    continue;
                }
                if rng.random::<f64>() < density {
                    let idx = map.index(tile);
                    map.cells[idx] = TileKind::Destructible;
                }
            }
        }
        map.clear_spawn_area();
        map
    }

    /// True for border cells and interior cells at even (x, y)
    pub fn is_wall_slot(tile: IVec2) -> bool {
        tile.x == 0
            || tile.y == 0
            || tile.x == GRID_W - 1
            || tile.y == GRID_H - 1
            || (tile.x % 2 == 0 && tile.y % 2 == 0)
    }

    fn clear_spawn_area(&mut self) {
        for offset in SPAWN_CLEARING {
            let tile = SPAWN_TILE + offset;
            if self.kind(tile) == TileKind::Destructible {
                let idx = self.index(tile);
                self.cells[idx] = TileKind::Empty;
            }
        }
    }

    #[inline]
    fn index(&self, tile: IVec2) -> usize {
        (tile.y * self.width + tile.x) as usize
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Kind at a tile; out-of-bounds reads as wall
    pub fn kind(&self, tile: IVec2) -> TileKind {
        if !in_bounds(tile) {
            return TileKind::Wall;
        }
        self.cells[self.index(tile)]
    }

    /// Overwrite a non-wall cell. Walls and out-of-bounds tiles are left alone,
    /// and a wall cannot be written anywhere.
    pub fn set(&mut self, tile: IVec2, kind: TileKind) -> bool {
        if !in_bounds(tile) || kind == TileKind::Wall {
            return false;
        }
        let idx = self.index(tile);
        if self.cells[idx] == TileKind::Wall {
            return false;
        }
        self.cells[idx] = kind;
        true
    }

    /// Out-of-bounds or wall: stops movement and flame alike
    pub fn solid(&self, tile: IVec2) -> bool {
        self.kind(tile) == TileKind::Wall
    }

    /// Terrain-only movement block (wall or destructible)
    pub fn obstructed(&self, tile: IVec2) -> bool {
        matches!(self.kind(tile), TileKind::Wall | TileKind::Destructible)
    }

    /// Movement/pathing block: terrain or a live bomb
    pub fn blocking(&self, tile: IVec2, bombs: &BombSystem) -> bool {
        self.obstructed(tile) || bombs.bomb_at(tile).is_some()
    }

    /// Iterate all tiles with their kinds, row-major
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, TileKind)> + '_ {
        self.cells.iter().enumerate().map(|(i, kind)| {
            let i = i as i32;
            (IVec2::new(i % self.width, i / self.width), *kind)
        })
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage_seed;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn stage_map(stage: u32) -> TileMap {
        let mut rng = Pcg32::seed_from_u64(stage_seed(stage));
        TileMap::generate(&mut rng, crate::consts::DESTRUCTIBLE_DENSITY)
    }

    #[test]
    fn test_walls_form_border_and_lattice() {
        let map = stage_map(1);
        for (tile, kind) in map.iter() {
            assert_eq!(
                kind == TileKind::Wall,
                TileMap::is_wall_slot(tile),
                "tile {tile} is {kind:?}"
            );
        }
    }

    #[test]
    fn test_spawn_area_is_clear() {
        let map = stage_map(3);
        for offset in SPAWN_CLEARING {
            let kind = map.kind(SPAWN_TILE + offset);
            assert_ne!(kind, TileKind::Destructible);
        }
        assert_eq!(map.kind(SPAWN_TILE), TileKind::Empty);
        assert_eq!(map.kind(IVec2::new(2, 1)), TileKind::Empty);
        assert_eq!(map.kind(IVec2::new(1, 2)), TileKind::Empty);
    }

    #[test]
    fn test_generation_has_reasonable_density() {
        let map = stage_map(1);
        let open = map.count(TileKind::Empty) + map.count(TileKind::Destructible);
        let ratio = map.count(TileKind::Destructible) as f64 / open as f64;
        assert!(ratio > 0.4 && ratio < 0.9, "density {ratio}");
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let map = TileMap::walled();
        let bombs = BombSystem::default();
        for tile in [IVec2::new(-1, 0), IVec2::new(0, -1), IVec2::new(13, 5), IVec2::new(5, 11)] {
            assert!(map.solid(tile));
            assert!(map.blocking(tile, &bombs));
            assert_eq!(map.kind(tile), TileKind::Wall);
        }
    }

    #[test]
    fn test_walls_cannot_be_overwritten() {
        let mut map = TileMap::walled();
        assert!(!map.set(IVec2::new(0, 0), TileKind::Empty));
        assert!(!map.set(IVec2::new(2, 2), TileKind::Destructible));
        assert!(!map.set(IVec2::new(1, 1), TileKind::Wall));
        assert!(map.set(IVec2::new(1, 1), TileKind::Destructible));
        assert_eq!(map.kind(IVec2::new(1, 1)), TileKind::Destructible);
    }

    #[test]
    fn test_destructible_blocks_movement_but_is_not_solid() {
        let mut map = TileMap::walled();
        let tile = IVec2::new(3, 1);
        map.set(tile, TileKind::Destructible);
        assert!(!map.solid(tile));
        assert!(map.blocking(tile, &BombSystem::default()));
        map.set(tile, TileKind::PowerupFire);
        assert!(!map.blocking(tile, &BombSystem::default()));
    }

    proptest! {
        #[test]
        fn prop_same_stage_same_map(stage in 0u32..500) {
            prop_assert_eq!(stage_map(stage), stage_map(stage));
        }
    }
}
