//! Deterministic simulation module
//!
//! All physics and note selection lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (container order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod command;
pub mod geometry;
pub mod pitch;
pub mod reflect;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::{Bounce, ball_touches_segment, proximity_surplus, resolve_collisions};
pub use command::{Command, HeldKeys, Key};
pub use geometry::distance;
pub use pitch::{PitchInput, PitchMode, map_pitch};
pub use reflect::reflect_off_segment;
pub use state::{Ball, Channel, ChannelId, Dropper, Endpoint, Pick, Segment, SimState};
pub use tick::tick;
