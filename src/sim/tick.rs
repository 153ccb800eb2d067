//! Fixed timestep simulation tick
//!
//! One call advances the stage by exactly one tick in a fixed order:
//! bomb placement, player movement, bombs and flames, enemies, collision
//! resolution, then the stage-end check.

use serde::{Deserialize, Serialize};

use super::collision;
use super::movement::Direction;
use super::state::{GameEvent, GameState, StageOutcome};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Requested walking direction
    pub direction: Option<Direction>,
    /// Drop a bomb on the current tile
    pub place_bomb: bool,
}

/// Advance the stage by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Terminal stages are frozen until the session replaces them
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    if input.place_bomb {
        state.place_bomb();
    }

    // Movement
    let speed = state.tuning.player_step_speed;
    state.player.movement.update(
        &mut state.player.pos,
        input.direction,
        speed,
        &state.map,
        &state.bombs,
    );

    // Bombs and flames
    let detonations = state
        .bombs
        .update(&mut state.map, &mut state.rng, &state.tuning);
    for detonation in detonations {
        state.events.push(GameEvent::Exploded {
            tile: detonation.bomb.tile,
            chained: detonation.chained,
        });
        for (tile, kind) in detonation.destroyed {
            if kind.is_powerup() {
                state.events.push(GameEvent::PowerupSpawned { tile, kind });
            }
        }
    }

    // Enemies
    for enemy in &mut state.enemies {
        if enemy.update(&state.map, &state.bombs, &mut state.rng, &state.tuning) {
            state.events.push(GameEvent::EnemyKilled { id: enemy.id });
        }
    }

    collision::resolve(state);

    if state.player.lives == 0 {
        state.outcome = StageOutcome::Defeated;
        state.events.push(GameEvent::Defeated);
        log::info!("Stage {} lost after {} ticks", state.stage, state.time_ticks);
    } else if state.living_enemies() == 0 {
        state.outcome = StageOutcome::Cleared;
        state.events.push(GameEvent::StageCleared);
        log::info!("Stage {} cleared after {} ticks", state.stage, state.time_ticks);
    }
}
