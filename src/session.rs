//! Stage session
//!
//! Owns the current `GameState` and everything that lives across stages:
//! the stage counter, the tuning, pause state, and the frame accumulator.

use crate::audio::{SoundCue, SoundSink};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::input::{ActionState, InputAction, InputSource};
use crate::renderer::{RenderSink, RenderView};
use crate::sim::{GameState, StageOutcome, tick};
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Playing,
    /// Simulation frozen until Pause is pressed again
    Paused,
    /// Every enemy dead, waiting to continue to the next stage
    Cleared,
    /// Out of lives, waiting to retry the same stage
    Defeated,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Cleared | SessionPhase::Defeated)
    }
}

pub struct Session {
    stage: u32,
    tuning: Tuning,
    state: GameState,
    phase: SessionPhase,
    /// Input polls so far (one per update)
    frame: u64,
    accumulator: f32,
}

impl Session {
    pub fn new(stage: u32, tuning: Tuning) -> Self {
        let stage = stage.max(1);
        let tuning = tuning.sanitized();
        Self {
            stage,
            state: GameState::new(stage, tuning.clone()),
            tuning,
            phase: SessionPhase::Playing,
            frame: 0,
            accumulator: 0.0,
        }
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Regenerate `stage` from its seed and resume play
    pub fn reset(&mut self, stage: u32) {
        self.stage = stage.max(1);
        self.state = GameState::new(self.stage, self.tuning.clone());
        self.phase = SessionPhase::Playing;
        self.accumulator = 0.0;
    }

    /// One fixed step: session controls, at most one simulation tick, then a
    /// frame for the render sink
    pub fn update(
        &mut self,
        actions: &ActionState,
        sound: &mut dyn SoundSink,
        render: &mut dyn RenderSink,
    ) {
        self.step(actions, sound);
        self.present(render);
    }

    fn step(&mut self, actions: &ActionState, sound: &mut dyn SoundSink) {
        self.frame += 1;

        if self.phase.is_terminal() {
            let proceed = actions.is_pressed(InputAction::PlaceBomb)
                || actions.is_pressed(InputAction::Restart);
            if proceed {
                let next = match self.phase {
                    SessionPhase::Cleared => self.stage + 1,
                    _ => self.stage,
                };
                log::info!("Continuing to stage {}", next);
                self.reset(next);
            }
            return;
        }

        if actions.is_pressed(InputAction::Restart) {
            log::info!("Restarting stage {}", self.stage);
            self.reset(self.stage);
            return;
        }

        if actions.is_pressed(InputAction::Pause) {
            self.phase = match self.phase {
                SessionPhase::Paused => SessionPhase::Playing,
                _ => SessionPhase::Paused,
            };
            log::info!("Session {:?}", self.phase);
        }
        if self.phase == SessionPhase::Paused {
            return;
        }

        tick(&mut self.state, &actions.tick_input());

        for event in self.state.drain_events() {
            if let Some(cue) = SoundCue::for_event(&event) {
                sound.play(cue);
            }
        }

        self.phase = match self.state.outcome {
            StageOutcome::InProgress => SessionPhase::Playing,
            StageOutcome::Cleared => SessionPhase::Cleared,
            StageOutcome::Defeated => SessionPhase::Defeated,
        };
    }

    /// Feed wall-clock time; runs as many fixed steps as have accumulated
    pub fn advance(
        &mut self,
        dt: f32,
        input: &mut dyn InputSource,
        sound: &mut dyn SoundSink,
        render: &mut dyn RenderSink,
    ) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let actions = input.poll(self.frame);
            self.update(&actions, sound, render);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    pub fn present(&self, sink: &mut dyn RenderSink) {
        sink.present(&RenderView::new(&self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;
    use crate::renderer::AsciiRenderer;

    #[derive(Default)]
    struct Recorder(Vec<SoundCue>);

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.push(cue);
        }
    }

    fn press(action: InputAction) -> ActionState {
        ActionState::empty().with_pressed(action)
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = Session::new(1, Tuning::default());
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();
        session.update(&ActionState::empty(), &mut sound, &mut frames);
        assert_eq!(session.state().time_ticks, 1);

        session.update(&press(InputAction::Pause), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Paused);
        session.update(&ActionState::empty(), &mut sound, &mut frames);
        assert_eq!(session.state().time_ticks, 1);

        // Unpausing ticks on the same step
        session.update(&press(InputAction::Pause), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.state().time_ticks, 2);
        assert_eq!(session.frame(), 4);
    }

    #[test]
    fn test_restart_regenerates_stage() {
        let mut session = Session::new(3, Tuning::default());
        let fresh = serde_json::to_string(session.state()).unwrap();
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();
        session.update(&press(InputAction::PlaceBomb), &mut sound, &mut frames);
        assert_eq!(sound.0, vec![SoundCue::BombPlaced]);
        assert_eq!(session.state().bombs.bombs().len(), 1);

        session.update(&press(InputAction::Restart), &mut sound, &mut frames);
        assert_eq!(session.stage(), 3);
        assert_eq!(serde_json::to_string(session.state()).unwrap(), fresh);
    }

    #[test]
    fn test_clear_continues_to_next_stage() {
        let mut session = Session::new(1, Tuning::default());
        for enemy in &mut session.state.enemies {
            enemy.alive = false;
        }
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();
        session.update(&ActionState::empty(), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Cleared);
        assert_eq!(sound.0, vec![SoundCue::StageClear]);

        // Frozen until the player continues
        session.update(&ActionState::empty(), &mut sound, &mut frames);
        assert_eq!(session.state().time_ticks, 1);

        session.update(&press(InputAction::PlaceBomb), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.stage(), 2);
        assert_eq!(session.state().stage, 2);
        assert_eq!(session.state().time_ticks, 0);
    }

    #[test]
    fn test_defeat_retries_same_stage() {
        let mut session = Session::new(2, Tuning::default());
        session.state.player.lives = 0;
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();
        session.update(&ActionState::empty(), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Defeated);

        // Pause does nothing in a terminal phase
        session.update(&press(InputAction::Pause), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Defeated);

        session.update(&press(InputAction::Restart), &mut sound, &mut frames);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.stage(), 2);
        assert_eq!(session.state().player.lives, 3);
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut session = Session::new(1, Tuning::default());
        let mut input = ScriptedInput::new().tap(0, InputAction::PlaceBomb);
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();

        assert_eq!(session.advance(SIM_DT * 2.5, &mut input, &mut sound, &mut frames), 2);
        assert_eq!(session.state().time_ticks, 2);
        assert_eq!(sound.0, vec![SoundCue::BombPlaced]);

        // Huge frame is clamped
        let steps = session.advance(5.0, &mut input, &mut sound, &mut frames);
        assert!(steps > 0 && steps <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_every_step_presents_a_frame() {
        let mut session = Session::new(1, Tuning::default());
        let mut input = ScriptedInput::new()
            .tap(3, InputAction::Pause)
            .tap(6, InputAction::Pause);
        let mut sound = Recorder::default();
        let mut frames = AsciiRenderer::new();

        let mut steps = 0;
        for _ in 0..20 {
            steps += session.advance(SIM_DT * 1.5, &mut input, &mut sound, &mut frames) as u64;
            assert_eq!(frames.frames_presented(), steps);
        }
        assert_eq!(steps, session.frame());
        // Paused steps still draw, but only unpaused ones tick
        assert_eq!(session.state().time_ticks, steps - 3);
        let hud = format!("STAGE 1  LIVES 3  BOMBS 1  FIRE 2  T{}", steps - 3);
        assert!(frames.frame().starts_with(&hud));
    }

    #[test]
    fn test_present_hands_view_to_sink() {
        struct Capture(Option<(u32, u8)>);
        impl RenderSink for Capture {
            fn present(&mut self, view: &RenderView<'_>) {
                self.0 = Some((view.stage(), view.lives()));
            }
        }
        let session = Session::new(4, Tuning::default());
        let mut sink = Capture(None);
        session.present(&mut sink);
        assert_eq!(sink.0, Some((4, 3)));
    }
}
