//! Sound cues
//!
//! The simulation never plays audio itself. The session maps simulation events
//! to cues and hands them to whatever sink the host provides; sinks cannot
//! report failure back into the game.

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Bomb dropped
    BombPlaced,
    /// A bomb went off (once per bomb in a chain)
    Explosion,
    /// Powerup collected
    Pickup,
    /// Player lost a life
    Damage,
    /// Last enemy down
    StageClear,
}

impl SoundCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BombPlaced { .. } => Some(SoundCue::BombPlaced),
            GameEvent::Exploded { .. } => Some(SoundCue::Explosion),
            GameEvent::PickedUp { .. } => Some(SoundCue::Pickup),
            GameEvent::PlayerDamaged { .. } => Some(SoundCue::Damage),
            GameEvent::StageCleared => Some(SoundCue::StageClear),
            GameEvent::PowerupSpawned { .. }
            | GameEvent::EnemyKilled { .. }
            | GameEvent::Defeated => None,
        }
    }

    /// Sound bank slot
    pub fn slot(self) -> u8 {
        match self {
            SoundCue::BombPlaced => 0,
            SoundCue::Explosion => 1,
            SoundCue::Pickup => 2,
            SoundCue::Damage => 3,
            SoundCue::StageClear => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoundCue::BombPlaced => "bomb_placed",
            SoundCue::Explosion => "explosion",
            SoundCue::Pickup => "pickup",
            SoundCue::Damage => "damage",
            SoundCue::StageClear => "stage_clear",
        }
    }
}

/// Fire-and-forget audio output
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSoundSink;

impl SoundSink for NullSoundSink {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Headless sink that logs cues
#[derive(Debug, Clone)]
pub struct LogSoundSink {
    volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogSoundSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSoundSink {
    pub fn new() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            played: 0,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues that were actually audible
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl SoundSink for LogSoundSink {
    fn play(&mut self, cue: SoundCue) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        self.played += 1;
        log::debug!("sound {} (slot {}, volume {:.2})", cue.as_str(), cue.slot(), self.volume);
    }
}
