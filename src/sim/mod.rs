//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one 60 Hz step)
//! - Seeded RNG only, owned by the stage state
//! - Stable iteration order (placement / spawn order)
//! - No rendering, audio or platform dependencies

pub mod bomb;
pub mod collision;
pub mod enemy;
pub mod movement;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use bomb::{ActorId, Bomb, BombSystem, Detonation, Flame, PLAYER_ID, blast_tiles, roll_drop};
pub use collision::{Rect, rect_vs_blocking, resolve};
pub use enemy::{Enemy, spawn_enemies};
pub use movement::{Direction, MovementController, StepState};
pub use state::{DamageCause, GameEvent, GameState, Player, StageOutcome};
pub use tick::{TickInput, tick};
pub use tilemap::{TileKind, TileMap};
