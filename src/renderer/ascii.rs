//! Text renderer for terminals and logs

use std::fmt::Write;

use glam::IVec2;

use super::{RenderSink, RenderView};
use crate::pixel_to_tile;
use crate::sim::TileKind;

/// Draws the board as one character per tile
#[derive(Debug, Default, Clone)]
pub struct AsciiRenderer {
    frame: String,
    frames: u64,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently presented frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    fn glyph(view: &RenderView<'_>, tile: IVec2) -> char {
        if view.in_flame(tile) {
            return '*';
        }
        if view.bombs().any(|b| b.tile == tile) {
            return 'o';
        }
        match view.tile_kind(tile) {
            TileKind::Empty => '.',
            TileKind::Wall => '#',
            TileKind::Destructible => '+',
            TileKind::PowerupBomb => 'B',
            TileKind::PowerupFire => 'F',
        }
    }
}

impl RenderSink for AsciiRenderer {
    fn present(&mut self, view: &RenderView<'_>) {
        let mut rows: Vec<Vec<char>> = (0..view.height())
            .map(|y| (0..view.width()).map(|x| Self::glyph(view, IVec2::new(x, y))).collect())
            .collect();

        let mut put = |tile: IVec2, c: char| {
            if let Some(cell) = rows
                .get_mut(tile.y as usize)
                .and_then(|row| row.get_mut(tile.x as usize))
            {
                *cell = c;
            }
        };
        for enemy in view.enemies().filter(|e| e.alive) {
            put(pixel_to_tile(enemy.pos), 'E');
        }
        let player = view.player();
        if player.alive {
            put(pixel_to_tile(player.pos), if view.player_invulnerable() { 'p' } else { 'P' });
        }

        self.frame.clear();
        let _ = writeln!(
            self.frame,
            "STAGE {}  LIVES {}  BOMBS {}  FIRE {}  T{}",
            view.stage(),
            view.lives(),
            view.bomb_capacity(),
            view.power(),
            view.time_ticks()
        );
        for row in rows {
            self.frame.extend(row);
            self.frame.push('\n');
        }
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::GameState;

    #[test]
    fn test_blank_arena_frame() {
        let mut state = GameState::blank(Tuning::default(), 1);
        state.map.set(IVec2::new(3, 1), TileKind::Destructible);
        state.spawn_enemy(IVec2::new(5, 1), None);
        let mut renderer = AsciiRenderer::new();
        renderer.present(&RenderView::new(&state));

        let lines: Vec<&str> = renderer.frame().lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("STAGE 0  LIVES 3  BOMBS 1  FIRE 2"));
        assert_eq!(lines[1], "#############");
        assert_eq!(lines[2], "#P.+.E......#");
        assert_eq!(lines[3], "#.#.#.#.#.#.#");
        assert_eq!(renderer.frames_presented(), 1);
    }
}
