//! Rendering boundary
//!
//! Renderers receive a read-only `RenderView` once per tick and never feed
//! anything back into the simulation.

pub mod ascii;

pub use ascii::AsciiRenderer;

use glam::{IVec2, Vec2};

use crate::sim::{GameState, StageOutcome, TileKind};

/// A live bomb as drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombView {
    pub tile: IVec2,
    /// 1.0 when placed, approaching 0.0 at detonation
    pub fuse_ratio: f32,
}

/// An actor as drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub pos: Vec2,
    pub alive: bool,
}

/// Query surface over one stage state
#[derive(Clone, Copy)]
pub struct RenderView<'a> {
    state: &'a GameState,
}

impl<'a> RenderView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    pub fn width(&self) -> i32 {
        self.state.map.width()
    }

    pub fn height(&self) -> i32 {
        self.state.map.height()
    }

    pub fn tile_kind(&self, tile: IVec2) -> TileKind {
        self.state.map.kind(tile)
    }

    pub fn bombs(&self) -> impl Iterator<Item = BombView> + 'a {
        self.state.bombs.bombs().iter().map(|b| BombView {
            tile: b.tile,
            fuse_ratio: b.fuse_ratio(),
        })
    }

    /// Tile sets of every live flame (may overlap)
    pub fn flames(&self) -> impl Iterator<Item = &'a [IVec2]> + 'a {
        self.state.bombs.flames().iter().map(|f| f.tiles.as_slice())
    }

    pub fn in_flame(&self, tile: IVec2) -> bool {
        self.state.in_flame(tile)
    }

    pub fn player(&self) -> ActorView {
        ActorView {
            pos: self.state.player.pos,
            alive: self.state.player.alive,
        }
    }

    /// Blink while invulnerable
    pub fn player_invulnerable(&self) -> bool {
        self.state.player.invulnerable_ticks > 0
    }

    pub fn enemies(&self) -> impl Iterator<Item = ActorView> + 'a {
        self.state.enemies.iter().map(|e| ActorView {
            pos: e.pos,
            alive: e.alive,
        })
    }

    pub fn lives(&self) -> u8 {
        self.state.player.lives
    }

    pub fn bomb_capacity(&self) -> u8 {
        self.state.player.bomb_capacity
    }

    pub fn power(&self) -> u8 {
        self.state.player.power
    }

    pub fn stage(&self) -> u32 {
        self.state.stage
    }

    pub fn outcome(&self) -> StageOutcome {
        self.state.outcome
    }

    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }
}

/// Anything that can draw a frame
pub trait RenderSink {
    fn present(&mut self, view: &RenderView<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::{Direction, TickInput, tick};

    #[test]
    fn test_view_reports_bomb_fuse_ratio() {
        let mut state = GameState::blank(Tuning::default(), 1);
        state.spawn_enemy(IVec2::new(11, 9), None);
        tick(
            &mut state,
            &TickInput {
                direction: Some(Direction::Right),
                place_bomb: true,
            },
        );
        let view = RenderView::new(&state);
        let bombs: Vec<_> = view.bombs().collect();
        assert_eq!(bombs.len(), 1);
        assert_eq!(bombs[0].tile, IVec2::new(1, 1));
        assert!(bombs[0].fuse_ratio < 1.0 && bombs[0].fuse_ratio > 0.99);
        assert_eq!(view.enemies().filter(|e| e.alive).count(), 1);
        assert_eq!(view.lives(), 3);
        assert_eq!(view.flames().count(), 0);
    }
}
