//! Typed input commands
//!
//! The input collaborator translates DOM events into [`Command`]s and queues
//! them; the session applies the queue at the start of every tick.

use glam::Vec2;

use super::pitch::PitchMode;
use super::state::ChannelId;
use crate::audio::InstrumentId;
use crate::settings::Settings;

/// Keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Backspace,
    Shift,
}

impl Key {
    pub const COUNT: usize = 3;

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" => Some(Key::Space),
            "Backspace" => Some(Key::Backspace),
            "Shift" => Some(Key::Shift),
            _ => None,
        }
    }
}

/// Which keys are currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys([bool; Key::COUNT]);

impl HeldKeys {
    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.0[key as usize]
    }

    #[inline]
    pub fn set(&mut self, key: Key, held: bool) {
        self.0[key as usize] = held;
    }

    /// Shift held = edit mode
    #[inline]
    pub fn shift(&self) -> bool {
        self.is_held(Key::Shift)
    }
}

/// A single user action
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pointer click at viewport coordinates
    Click { pos: Vec2 },
    /// Pointer moved to viewport coordinates
    MouseMove { pos: Vec2 },
    KeyDown(Key),
    KeyUp(Key),
    TogglePause,
    /// Remove every ball, keep the scene
    ClearBalls,
    SelectChannel(ChannelId),
    /// Add a channel and make it current
    AddChannel {
        color: String,
        instrument: InstrumentId,
    },
    /// Delete the current channel (refused for the last one)
    DeleteChannel,
    SetChannelColor(String),
    SetChannelInstrument(InstrumentId),
    SetStartPitch(u8),
    SetEndPitch(u8),
    /// Both bounds of the current channel's range
    SetPitchRange { start: u8, end: u8 },
    SetPitchMode(PitchMode),
    SetGravity(f32),
    SetCollisionThreshold(f32),
    SetDropCadence(u64),
    /// Changes the tick timer interval
    SetFrameRate(u32),
    /// Viewport resized
    Resize { width: f32, height: f32 },
    /// Replace every setting at once
    UpdateSettings(Settings),
}
