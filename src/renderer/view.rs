//! Read-only scene snapshot with colors resolved

use glam::Vec2;

use crate::consts::{BALL_COLOR, BG_COLOR};
use crate::settings::Settings;
use crate::sim::{Ball, ChannelId, SimState};

/// A ball ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSprite<'a> {
    pub pos: Vec2,
    /// Color of the channel last bounced off, default gray before any bounce
    pub color: &'a str,
    pub radius: f32,
}

/// A line ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSprite<'a> {
    pub p1: Vec2,
    pub p2: Vec2,
    pub color: &'a str,
}

/// The line being drawn: first click to the pointer
pub type DraftLine<'a> = LineSprite<'a>;

/// What the render collaborator sees of a session
pub struct SceneView<'a> {
    state: &'a SimState,
    settings: &'a Settings,
}

impl<'a> SceneView<'a> {
    pub fn new(state: &'a SimState, settings: &'a Settings) -> Self {
        Self { state, settings }
    }

    pub fn width(&self) -> f32 {
        self.settings.width
    }

    pub fn height(&self) -> f32 {
        self.settings.height
    }

    pub fn background(&self) -> &'static str {
        BG_COLOR
    }

    fn channel_color(&self, id: ChannelId) -> &'a str {
        self.state
            .channel(id)
            .map(|c| c.color.as_str())
            .unwrap_or(BALL_COLOR)
    }

    /// Draw color for a ball
    pub fn ball_color(&self, ball: &Ball) -> &'a str {
        ball.channel
            .map(|id| self.channel_color(id))
            .unwrap_or(BALL_COLOR)
    }

    pub fn balls(&self) -> impl Iterator<Item = BallSprite<'a>> + '_ {
        let radius = self.settings.ball_radius;
        self.state.balls.iter().map(move |b| BallSprite {
            pos: b.pos,
            color: self.ball_color(b),
            radius,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = LineSprite<'a>> + '_ {
        self.state.segments.iter().map(move |s| LineSprite {
            p1: s.p1,
            p2: s.p2,
            color: self.channel_color(s.channel),
        })
    }

    pub fn droppers(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.state.droppers.iter().map(|d| d.pos)
    }

    /// In-progress line, from the first click to the pointer
    pub fn draft_line(&self) -> Option<DraftLine<'a>> {
        let from = self.state.draft?;
        Some(LineSprite {
            p1: from,
            p2: self.state.mouse_pos,
            color: self.channel_color(self.state.current_channel),
        })
    }

    pub fn paused(&self) -> bool {
        self.state.paused
    }

    /// Name of the most recent note
    pub fn last_note_label(&self) -> Option<String> {
        self.state.last_note.map(|n| crate::audio::Note(n).label())
    }

    /// Status text drawn in the corner: last note, then a pause marker
    pub fn status_label(&self) -> Option<String> {
        let note = self.last_note_label();
        match (note, self.paused()) {
            (Some(note), true) => Some(format!("{note} (paused)")),
            (Some(note), false) => Some(note),
            (None, true) => Some("(paused)".to_string()),
            (None, false) => None,
        }
    }
}
