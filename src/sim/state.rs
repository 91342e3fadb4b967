//! Simulation state and scene entities
//!
//! Everything the tick and the authoring commands mutate lives in [`SimState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::command::HeldKeys;
use super::geometry::{distance, order_by_x};
use crate::audio::{InstrumentId, MAX_NOTE};
use crate::consts::DEFAULT_DROPPER;

/// Stable channel identifier (survives deletion of other channels)
pub type ChannelId = u32;

/// A falling ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Channel of the last segment this ball bounced off
    pub channel: Option<ChannelId>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            channel: None,
        }
    }

    /// Whether the ball has left the viewport (edges themselves are inside)
    #[inline]
    pub fn out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.y > height || self.pos.x < 0.0 || self.pos.x > width
    }
}

/// A reflective barrier, always stored left endpoint first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p1: Vec2,
    pub p2: Vec2,
    pub channel: ChannelId,
}

impl Segment {
    /// Build a segment with endpoints ordered by x
    pub fn new(a: Vec2, b: Vec2, channel: ChannelId) -> Self {
        let (p1, p2) = order_by_x(a, b);
        Self { p1, p2, channel }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        distance(self.p1, self.p2)
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }

    /// Restore the p1.x <= p2.x ordering after an endpoint moved
    pub fn canonicalize(&mut self) {
        let (p1, p2) = order_by_x(self.p1, self.p2);
        self.p1 = p1;
        self.p2 = p2;
    }

    #[inline]
    pub fn endpoint(&self, end: Endpoint) -> Vec2 {
        match end {
            Endpoint::P1 => self.p1,
            Endpoint::P2 => self.p2,
        }
    }

    #[inline]
    pub fn endpoint_mut(&mut self, end: Endpoint) -> &mut Vec2 {
        match end {
            Endpoint::P1 => &mut self.p1,
            Endpoint::P2 => &mut self.p2,
        }
    }
}

/// Which end of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    P1,
    P2,
}

/// Ball emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropper {
    pub pos: Vec2,
}

/// Color + voice + note range shared by a group of segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    /// CSS color string
    pub color: String,
    pub instrument: InstrumentId,
    /// Lowest note index (inclusive)
    pub start_pitch: u8,
    /// Highest note index (inclusive)
    pub end_pitch: u8,
}

impl Channel {
    pub fn new(id: ChannelId, color: impl Into<String>, instrument: InstrumentId) -> Self {
        Self {
            id,
            color: color.into(),
            instrument,
            start_pitch: 24,
            end_pitch: 48,
        }
    }

    /// Move the lower bound; clamped so it never passes `end_pitch`
    pub fn set_start_pitch(&mut self, pitch: u8) {
        self.start_pitch = pitch.min(MAX_NOTE).min(self.end_pitch);
    }

    /// Move the upper bound; clamped so it never passes `start_pitch`
    pub fn set_end_pitch(&mut self, pitch: u8) {
        self.end_pitch = pitch.min(MAX_NOTE).max(self.start_pitch);
    }
}

/// Channels a fresh session starts with
pub fn default_channels() -> Vec<Channel> {
    vec![
        Channel::new(0, "#0033FF", InstrumentId::Sine),
        Channel {
            start_pitch: 12,
            end_pitch: 36,
            ..Channel::new(1, "#FF3300", InstrumentId::Triangle)
        },
        Channel {
            start_pitch: 36,
            end_pitch: 60,
            ..Channel::new(2, "#00AA44", InstrumentId::Square)
        },
    ]
}

/// Something held in edit mode, following the pointer until placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Endpoint { segment: usize, end: Endpoint },
    Dropper { index: usize },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    /// Live balls, spawn order
    pub balls: Vec<Ball>,
    /// Barriers, creation order
    pub segments: Vec<Segment>,
    /// Emitters (never empty)
    pub droppers: Vec<Dropper>,
    /// Channels (never empty)
    pub channels: Vec<Channel>,
    /// Ticks simulated while running
    pub frame_counter: u64,
    pub paused: bool,
    /// Channel new segments are tagged with
    pub current_channel: ChannelId,
    /// First click of a line in progress
    pub draft: Option<Vec2>,
    /// Last known pointer position
    pub mouse_pos: Vec2,
    pub held_keys: HeldKeys,
    /// Endpoint or dropper being moved in edit mode
    pub pick: Option<Pick>,
    /// Most recent note played (for display)
    pub last_note: Option<i32>,
    pub rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Fresh scene: default channels, one dropper, no lines or balls
    pub fn new(seed: u64) -> Self {
        let channels = default_channels();
        let current_channel = channels[0].id;
        Self {
            balls: Vec::new(),
            segments: Vec::new(),
            droppers: vec![Dropper {
                pos: Vec2::new(DEFAULT_DROPPER.0, DEFAULT_DROPPER.1),
            }],
            channels,
            frame_counter: 0,
            paused: false,
            current_channel,
            draft: None,
            mouse_pos: Vec2::new(-1.0, -1.0),
            held_keys: HeldKeys::default(),
            pick: None,
            last_note: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2) {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel));
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.id == id)
    }

    /// The channel new lines are drawn with
    pub fn current(&self) -> Option<&Channel> {
        self.channel(self.current_channel)
    }

    /// One past the largest channel id in use
    pub fn next_channel_id(&self) -> ChannelId {
        self.channels.iter().map(|c| c.id + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_dropper_and_channel() {
        let state = SimState::new(1);
        assert_eq!(state.droppers.len(), 1);
        assert_eq!(state.droppers[0].pos, Vec2::new(40.0, 10.0));
        assert!(!state.channels.is_empty());
        assert!(state.current().is_some());
        assert!(state.draft.is_none());
    }

    #[test]
    fn test_segment_is_canonical() {
        let seg = Segment::new(Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0), 0);
        assert_eq!(seg.p1, Vec2::new(10.0, 10.0));
        assert_eq!(seg.p2, Vec2::new(50.0, 50.0));

        let mut moved = seg;
        moved.p1 = Vec2::new(90.0, 0.0);
        moved.canonicalize();
        assert_eq!(moved.p1, Vec2::new(50.0, 50.0));
        assert_eq!(moved.p2, Vec2::new(90.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds_edges_are_inside() {
        let mut ball = Ball::new(1, Vec2::new(10.0, 300.0), Vec2::ZERO);
        assert!(!ball.out_of_bounds(600.0, 300.0));
        ball.pos.y = 300.01;
        assert!(ball.out_of_bounds(600.0, 300.0));
        ball.pos = Vec2::new(0.0, 10.0);
        assert!(!ball.out_of_bounds(600.0, 300.0));
        ball.pos.x = -0.01;
        assert!(ball.out_of_bounds(600.0, 300.0));
        ball.pos.x = 600.5;
        assert!(ball.out_of_bounds(600.0, 300.0));
        // Above the top edge is fine (balls can bounce up and fall back)
        ball.pos = Vec2::new(10.0, -50.0);
        assert!(!ball.out_of_bounds(600.0, 300.0));
    }

    #[test]
    fn test_channel_range_never_crosses() {
        let mut ch = Channel::new(0, "#000", InstrumentId::Sine);
        ch.start_pitch = 20;
        ch.end_pitch = 30;

        ch.set_start_pitch(40);
        assert_eq!((ch.start_pitch, ch.end_pitch), (30, 30));

        ch.set_start_pitch(10);
        ch.set_end_pitch(5);
        assert_eq!((ch.start_pitch, ch.end_pitch), (10, 10));

        ch.set_end_pitch(250);
        assert_eq!(ch.end_pitch, MAX_NOTE);
    }

    #[test]
    fn test_channel_ids() {
        let mut state = SimState::new(1);
        let id = state.next_channel_id();
        assert!(state.channel(id).is_none());
        state.channels.push(Channel::new(id, "#123456", InstrumentId::Sawtooth));
        assert_eq!(state.next_channel_id(), id + 1);
        assert_eq!(state.next_entity_id(), 1);
        assert_eq!(state.next_entity_id(), 2);
    }
}
