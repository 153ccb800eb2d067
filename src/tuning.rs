//! Data-driven game balance
//!
//! Every tick count, speed and cap the simulation reads lives here so a stage
//! can be replayed with different balance without touching code. Defaults match
//! `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bombs ===
    /// Ticks between placement and detonation
    pub bomb_fuse_ticks: u32,
    /// Ticks a flame stays on the board
    pub flame_ticks: u32,
    /// Drop roll below this spawns an extra-bomb powerup
    pub drop_bomb_below: f64,
    /// Drop roll below this (and above the bomb threshold) spawns a fire powerup
    pub drop_fire_below: f64,

    // === Player ===
    pub player_step_speed: f32,
    pub initial_lives: u8,
    pub initial_bombs: u8,
    pub initial_power: u8,
    pub max_bombs: u8,
    pub max_power: u8,
    pub invulnerable_ticks: u32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_keep_direction: f64,
    pub max_enemies: usize,

    // === Map ===
    pub destructible_density: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bomb_fuse_ticks: BOMB_FUSE_TICKS,
            flame_ticks: FLAME_TICKS,
            drop_bomb_below: DROP_BOMB_BELOW,
            drop_fire_below: DROP_FIRE_BELOW,

            player_step_speed: PLAYER_STEP_SPEED,
            initial_lives: INITIAL_LIVES,
            initial_bombs: INITIAL_BOMBS,
            initial_power: INITIAL_POWER,
            max_bombs: MAX_BOMBS_CAP,
            max_power: MAX_POWER_CAP,
            invulnerable_ticks: INVULNERABLE_TICKS,

            enemy_speed: ENEMY_SPEED,
            enemy_keep_direction: ENEMY_KEEP_DIRECTION,
            max_enemies: MAX_ENEMIES,

            destructible_density: DESTRUCTIBLE_DENSITY,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning.sanitized()
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {} - using defaults", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read tuning file {}: {} - using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Clamp values into ranges the simulation can honor
    pub fn sanitized(mut self) -> Self {
        // A zero fuse or flame would never be observable for a full tick
        self.bomb_fuse_ticks = self.bomb_fuse_ticks.max(1);
        self.flame_ticks = self.flame_ticks.max(1);
        self.drop_bomb_below = self.drop_bomb_below.clamp(0.0, 1.0);
        self.drop_fire_below = self.drop_fire_below.clamp(self.drop_bomb_below, 1.0);
        self.initial_lives = self.initial_lives.max(1);
        self.max_bombs = self.max_bombs.max(1);
        self.max_power = self.max_power.max(1);
        self.initial_bombs = self.initial_bombs.clamp(1, self.max_bombs);
        self.initial_power = self.initial_power.clamp(1, self.max_power);
        self.player_step_speed = self.player_step_speed.clamp(0.1, TILE);
        // Enemies must land inside the centering window on every tile they cross
        self.enemy_speed = self.enemy_speed.clamp(0.1, ENEMY_CENTER_EPSILON * 2.0 - 0.1);
        self.enemy_keep_direction = self.enemy_keep_direction.clamp(0.0, 1.0);
        self.destructible_density = self.destructible_density.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bomb_fuse_ticks": 30, "initial_power": 4 }"#)
            .unwrap();
        assert_eq!(tuning.bomb_fuse_ticks, 30);
        assert_eq!(tuning.initial_power, 4);
        assert_eq!(tuning.flame_ticks, FLAME_TICKS);
        assert_eq!(tuning.max_bombs, MAX_BOMBS_CAP);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning {
            enemy_speed: 0.8,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_sanitized_clamps() {
        let tuning = Tuning {
            bomb_fuse_ticks: 0,
            drop_bomb_below: 0.5,
            drop_fire_below: 0.2,
            initial_bombs: 20,
            enemy_speed: 50.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.bomb_fuse_ticks, 1);
        assert_eq!(tuning.drop_fire_below, 0.5);
        assert_eq!(tuning.initial_bombs, tuning.max_bombs);
        assert!(tuning.enemy_speed < 2.0);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load("/nonexistent/grid-bomber-tuning.json");
        assert_eq!(tuning, Tuning::default());
    }
}
