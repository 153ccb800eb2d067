//! Game state and core simulation types
//!
//! Everything a stage needs to replay deterministically lives here, including
//! the RNG, so a snapshot serializes to a complete, resumable stage.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bomb::{BombSystem, PLAYER_ID};
use super::collision::Rect;
use super::enemy::{Enemy, spawn_enemies};
use super::movement::{Direction, MovementController};
use super::tilemap::{TileKind, TileMap};
use crate::consts::ACTOR_HALF_EXTENT;
use crate::{SPAWN_TILE, Tuning, pixel_to_tile, stage_seed, tile_center};

/// Terminal state of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageOutcome {
    #[default]
    InProgress,
    /// Every enemy is dead
    Cleared,
    /// The player ran out of lives
    Defeated,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    Flame,
    Enemy,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlaced { tile: IVec2 },
    Exploded { tile: IVec2, chained: bool },
    PowerupSpawned { tile: IVec2, kind: TileKind },
    PickedUp { tile: IVec2, kind: TileKind },
    PlayerDamaged { cause: DamageCause, lives_left: u8 },
    EnemyKilled { id: u32 },
    StageCleared,
    Defeated,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Pixel position (tile center at rest)
    pub pos: Vec2,
    /// Concurrent bomb limit
    pub bomb_capacity: u8,
    /// Blast radius of placed bombs
    pub power: u8,
    pub lives: u8,
    /// Ticks of damage immunity left
    pub invulnerable_ticks: u32,
    pub alive: bool,
    pub movement: MovementController,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tile_center(SPAWN_TILE),
            bomb_capacity: tuning.initial_bombs,
            power: tuning.initial_power,
            lives: tuning.initial_lives,
            invulnerable_ticks: 0,
            alive: true,
            movement: MovementController::default(),
        }
    }

    pub fn tile(&self) -> IVec2 {
        pixel_to_tile(self.pos)
    }

    pub fn rect(&self) -> Rect {
        Rect::around(self.pos, ACTOR_HALF_EXTENT)
    }

    /// Back to the spawn tile with no step in flight
    pub fn respawn(&mut self) {
        self.pos = tile_center(SPAWN_TILE);
        self.movement.reset();
    }

    /// Teleport to a tile center (tests and scripted setups)
    pub fn place_at(&mut self, tile: IVec2) {
        self.pos = tile_center(tile);
        self.movement.reset();
    }
}

/// Complete stage state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Stage number (1-based)
    pub stage: u32,
    /// Seed the RNG started from
    pub seed: u64,
    /// Single source of randomness: map, drops, enemy AI
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub map: TileMap,
    pub bombs: BombSystem,
    pub player: Player,
    /// Enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub outcome: StageOutcome,
    /// Events recorded since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_enemy_id: u32,
}

impl GameState {
    /// Generate a stage: terrain first, then enemies, both from the stage seed
    pub fn new(stage: u32, tuning: Tuning) -> Self {
        let seed = stage_seed(stage);
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = TileMap::generate(&mut rng, tuning.destructible_density);
        let enemies = spawn_enemies(&map, &mut rng, stage, tuning.max_enemies);
        log::info!(
            "Stage {} generated: seed={}, destructibles={}, enemies={}",
            stage,
            seed,
            map.count(TileKind::Destructible),
            enemies.len()
        );

        Self {
            stage,
            seed,
            rng,
            player: Player::new(&tuning),
            tuning,
            time_ticks: 0,
            map,
            bombs: BombSystem::default(),
            next_enemy_id: enemies.len() as u32,
            enemies,
            outcome: StageOutcome::InProgress,
            events: Vec::new(),
        }
    }

    /// Stage with default tuning
    pub fn for_stage(stage: u32) -> Self {
        Self::new(stage, Tuning::default())
    }

    /// Walls only, no destructibles, no enemies
    pub fn blank(tuning: Tuning, seed: u64) -> Self {
        Self {
            stage: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            tuning,
            time_ticks: 0,
            map: TileMap::walled(),
            bombs: BombSystem::default(),
            enemies: Vec::new(),
            outcome: StageOutcome::InProgress,
            events: Vec::new(),
            next_enemy_id: 0,
        }
    }

    /// Add an enemy centered on `tile`
    pub fn spawn_enemy(&mut self, tile: IVec2, direction: Option<Direction>) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.enemies.push(Enemy::new(id, tile, direction));
        id
    }

    /// Drop a bomb on the player's tile; silently refused when not allowed
    pub fn place_bomb(&mut self) -> bool {
        if !self.player.alive {
            return false;
        }
        let tile = self.player.tile();
        let placed = self.bombs.place(
            &self.map,
            tile,
            PLAYER_ID,
            self.player.power,
            self.player.bomb_capacity,
            self.tuning.bomb_fuse_ticks,
        );
        if placed.is_none() {
            return false;
        }
        self.player.movement.grant_pass_through(tile);
        self.events.push(GameEvent::BombPlaced { tile });
        true
    }

    pub fn in_flame(&self, tile: IVec2) -> bool {
        self.bombs.in_flame(tile)
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn is_over(&self) -> bool {
        self.outcome != StageOutcome::InProgress
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
