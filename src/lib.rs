//! Soundbars - draw lines, drop balls, hear them bounce
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity, collisions, reflection, note selection)
//! - `session`: Command queue + tick driver wiring the simulation to its collaborators
//! - `audio`: Note table and the audio-trigger collaborator
//! - `renderer`: Read-only scene view and the render collaborator
//! - `platform`: Frame timer discipline (one active interval at a time)
//! - `settings`: Runtime-tunable configuration

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use audio::{InstrumentId, Note, NoteRecorder, NoteSink};
pub use renderer::{RenderSink, SceneView};
pub use session::Session;
pub use settings::Settings;

/// Simulation configuration defaults
pub mod consts {
    /// Viewport dimensions (canvas pixels)
    pub const WIDTH: f32 = 600.0;
    pub const HEIGHT: f32 = 300.0;

    /// Tick rate of the frame timer (ticks per second)
    pub const FRAME_RATE: u32 = 96;
    /// Ticks between two spawns of the same dropper
    pub const DROP_CADENCE_TICKS: u64 = 500;

    /// Downward acceleration added to vy every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.03;
    /// Slack allowed by the distance-sum proximity test
    pub const COLLISION_THRESHOLD: f32 = 0.3;
    /// Speed that maps to the top of the range in exponential pitch mode
    pub const MAX_VELOCITY: f32 = 10.0;

    /// Ball draw size (half extent of the square)
    pub const BALL_RADIUS: f32 = 2.0;
    /// Pointer distance for picking endpoints/droppers in edit mode
    pub const PICK_RADIUS: f32 = 8.0;
    /// Note length handed to the instrument (seconds)
    pub const NOTE_DURATION: f32 = 0.5;

    /// Segment length per step down the scale in line-length pitch mode
    pub const LINE_LENGTH_STEP: f32 = 8.0;

    /// First dropper of a fresh session
    pub const DEFAULT_DROPPER: (f32, f32) = (40.0, 10.0);

    /// Colors
    pub const BG_COLOR: &str = "#EEE";
    pub const BALL_COLOR: &str = "#333";
}
