//! Wandering enemies
//!
//! Enemies pick a new heading only when centered on a tile, preferring to keep
//! going straight. Between decisions they slide at a fixed speed, swept one
//! axis at a time against blocking tiles.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bomb::BombSystem;
use super::collision::{Rect, rect_vs_blocking};
use super::movement::Direction;
use super::tilemap::{TileKind, TileMap};
use crate::consts::{ACTOR_HALF_EXTENT, ENEMY_CENTER_EPSILON, GRID_H, GRID_W};
use crate::{Tuning, in_bounds, pixel_to_tile, tile_center};

/// A wandering enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// `None` while boxed in
    pub direction: Option<Direction>,
    /// Cleared by flame, never set again
    pub alive: bool,
}

impl Enemy {
    pub fn new(id: u32, tile: IVec2, direction: Option<Direction>) -> Self {
        Self {
            id,
            pos: tile_center(tile),
            direction,
            alive: true,
        }
    }

    pub fn tile(&self) -> IVec2 {
        pixel_to_tile(self.pos)
    }

    pub fn rect(&self) -> Rect {
        Rect::around(self.pos, ACTOR_HALF_EXTENT)
    }

    /// Advance one tick. Returns true if the enemy died this tick.
    pub fn update(
        &mut self,
        map: &TileMap,
        bombs: &BombSystem,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) -> bool {
        if !self.alive {
            return false;
        }
        if bombs.in_flame(self.tile()) {
            self.alive = false;
            return true;
        }

        let tile = self.tile();
        let center = tile_center(tile);
        let delta = (self.pos - center).abs();
        if delta.x < ENEMY_CENTER_EPSILON && delta.y < ENEMY_CENTER_EPSILON {
            self.pos = center;
            self.choose_direction(tile, map, bombs, rng, tuning.enemy_keep_direction);
        }

        if let Some(direction) = self.direction {
            let step = direction.unit() * tuning.enemy_speed;

            let next = Vec2::new(self.pos.x + step.x, self.pos.y);
            if !rect_vs_blocking(&Rect::around(next, ACTOR_HALF_EXTENT), map, bombs) {
                self.pos.x = next.x;
            }
            let next = Vec2::new(self.pos.x, self.pos.y + step.y);
            if !rect_vs_blocking(&Rect::around(next, ACTOR_HALF_EXTENT), map, bombs) {
                self.pos.y = next.y;
            }
        }

        // Walking into a flame is as fatal as being caught by one
        if bombs.in_flame(self.tile()) {
            self.alive = false;
            return true;
        }
        false
    }

    fn choose_direction(
        &mut self,
        tile: IVec2,
        map: &TileMap,
        bombs: &BombSystem,
        rng: &mut Pcg32,
        keep_chance: f64,
    ) {
        let choices: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| {
                let next = tile + d.delta();
                in_bounds(next) && !map.blocking(next, bombs)
            })
            .collect();

        let keep = match self.direction {
            Some(current) if choices.contains(&current) => rng.random::<f64>() < keep_chance,
            _ => false,
        };
        if !keep {
            self.direction = choices.choose(rng).copied();
        }
    }
}

/// Spawn a stage's enemies on open tiles away from the player spawn
pub fn spawn_enemies(map: &TileMap, rng: &mut Pcg32, stage: u32, max_enemies: usize) -> Vec<Enemy> {
    let mut spots = Vec::new();
    for x in 1..GRID_W - 1 {
        for y in 1..GRID_H - 1 {
            let tile = IVec2::new(x, y);
            if map.kind(tile) == TileKind::Empty && x + y > 6 {
                spots.push(tile);
            }
        }
    }
    spots.shuffle(rng);

    let count = (3 + stage as usize / 2).min(max_enemies).min(spots.len());
    spots
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, tile)| {
            let direction = Direction::ALL.choose(rng).copied();
            Enemy::new(i as u32, tile, direction)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_enemy_dies_in_flame_and_stays_dead() {
        let map = TileMap::walled();
        let mut bombs = BombSystem::default();
        let tuning = Tuning::default();
        let mut rng = rng();
        let tile = IVec2::new(5, 5);
        let mut enemy = Enemy::new(0, tile, Some(Direction::Right));

        bombs.ignite(tile, vec![tile], 5);
        assert!(enemy.update(&map, &bombs, &mut rng, &tuning));
        assert!(!enemy.alive);
        let pos = enemy.pos;

        let bombs = BombSystem::default();
        for _ in 0..30 {
            assert!(!enemy.update(&map, &bombs, &mut rng, &tuning));
        }
        assert!(!enemy.alive);
        assert_eq!(enemy.pos, pos);
    }

    #[test]
    fn test_boxed_in_enemy_holds_position() {
        let mut map = TileMap::walled();
        // (1,1) has walls up/left; close right and down
        map.set(IVec2::new(2, 1), TileKind::Destructible);
        map.set(IVec2::new(1, 2), TileKind::Destructible);
        let bombs = BombSystem::default();
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemy = Enemy::new(0, IVec2::new(1, 1), Some(Direction::Right));

        for _ in 0..50 {
            enemy.update(&map, &bombs, &mut rng, &tuning);
        }
        assert_eq!(enemy.pos, tile_center(IVec2::new(1, 1)));
        assert_eq!(enemy.direction, None);
    }

    #[test]
    fn test_corridor_enemy_only_moves_along_corridor() {
        let mut map = TileMap::walled();
        // Row 1 corridor from x=1..=5, sealed below and at the end
        for x in [1, 3, 5] {
            map.set(IVec2::new(x, 2), TileKind::Destructible);
        }
        map.set(IVec2::new(6, 1), TileKind::Destructible);
        let bombs = BombSystem::default();
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemy = Enemy::new(0, IVec2::new(3, 1), Some(Direction::Up));

        for _ in 0..400 {
            enemy.update(&map, &bombs, &mut rng, &tuning);
            assert_eq!(enemy.pos.y, tile_center(IVec2::new(3, 1)).y);
            assert!(enemy.tile().x >= 1 && enemy.tile().x <= 5);
            assert!(!rect_vs_blocking(&enemy.rect(), &map, &bombs));
        }
    }

    #[test]
    fn test_enemy_never_enters_bomb_tile() {
        let map = TileMap::walled();
        let mut bombs = BombSystem::default();
        bombs.place(&map, IVec2::new(3, 1), 0, 1, 1, 10_000);
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemy = Enemy::new(0, IVec2::new(1, 1), Some(Direction::Right));

        for _ in 0..500 {
            enemy.update(&map, &bombs, &mut rng, &tuning);
            assert_ne!(enemy.tile(), IVec2::new(3, 1));
        }
    }

    #[test]
    fn test_spawn_enemies_deterministic() {
        let map = TileMap::walled();
        let a = spawn_enemies(&map, &mut rng(), 1, 6);
        let b = spawn_enemies(&map, &mut rng(), 1, 6);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(spawn_enemies(&map, &mut rng(), 9, 6).len(), 6);
        assert_eq!(spawn_enemies(&map, &mut rng(), 9, 2).len(), 2);
    }
}
