//! Logical input
//!
//! Backends (keyboard, touch, gamepad, scripts) each report which logical
//! actions are held or were just pressed. States from several backends merge
//! by OR before reaching the simulation, which never sees a device.

use crate::sim::{Direction, TickInput};

/// Logical actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PlaceBomb,
    Pause,
    Restart,
}

impl InputAction {
    fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Movement action for a direction
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => InputAction::MoveUp,
            Direction::Down => InputAction::MoveDown,
            Direction::Left => InputAction::MoveLeft,
            Direction::Right => InputAction::MoveRight,
        }
    }
}

/// Held/pressed flags for every action in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    held: u8,
    pressed: u8,
}

impl ActionState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Held down this tick
    pub fn with_held(mut self, action: InputAction) -> Self {
        self.held |= action.bit();
        self
    }

    /// Went down this tick (implies held)
    pub fn with_pressed(mut self, action: InputAction) -> Self {
        self.held |= action.bit();
        self.pressed |= action.bit();
        self
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.held & action.bit() != 0
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed & action.bit() != 0
    }

    /// OR two backends together
    pub fn merge(self, other: ActionState) -> Self {
        Self {
            held: self.held | other.held,
            pressed: self.pressed | other.pressed,
        }
    }

    /// Requested direction: a fresh press beats a long hold, ties go Right, Left, Down, Up
    pub fn direction(&self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| self.is_pressed(InputAction::for_direction(*d)))
            .or_else(|| {
                Direction::ALL
                    .into_iter()
                    .find(|d| self.is_held(InputAction::for_direction(*d)))
            })
    }

    /// Simulation input for this tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            direction: self.direction(),
            place_bomb: self.is_pressed(InputAction::PlaceBomb),
        }
    }
}

/// A source of logical input, polled once per tick
pub trait InputSource {
    fn poll(&mut self, tick: u64) -> ActionState;
}

/// Several backends folded into one
#[derive(Default)]
pub struct MergedInput {
    sources: Vec<Box<dyn InputSource>>,
}

impl MergedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl InputSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl InputSource for MergedInput {
    fn poll(&mut self, tick: u64) -> ActionState {
        self.sources
            .iter_mut()
            .fold(ActionState::empty(), |acc, source| acc.merge(source.poll(tick)))
    }
}

/// One scripted press: pressed on `start`, held for `hold` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub start: u64,
    pub hold: u64,
    pub action: InputAction,
}

/// Replays a fixed action timeline
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press `action` at `start` and keep it down for `hold` ticks
    pub fn hold(mut self, start: u64, hold: u64, action: InputAction) -> Self {
        self.steps.push(ScriptStep {
            start,
            hold: hold.max(1),
            action,
        });
        self
    }

    /// Single-tick press
    pub fn tap(self, start: u64, action: InputAction) -> Self {
        self.hold(start, 1, action)
    }

    /// Last tick any step is still active
    pub fn end(&self) -> u64 {
        self.steps.iter().map(|s| s.start + s.hold).max().unwrap_or(0)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, tick: u64) -> ActionState {
        self.steps.iter().fold(ActionState::empty(), |state, step| {
            if tick == step.start {
                state.with_pressed(step.action)
            } else if tick > step.start && tick < step.start + step.hold {
                state.with_held(step.action)
            } else {
                state
            }
        })
    }
}
