//! Ball/segment contact and bounce resolution
//!
//! Contact uses the distance-sum heuristic: a point lies on a segment exactly
//! when its distances to both endpoints add up to the segment length, so a
//! small surplus means "close enough". This is not an exact point-to-segment
//! test; with large thresholds it also fires near the segment's extension.

use glam::Vec2;

use super::geometry::distance;
use super::pitch::{PitchInput, map_pitch};
use super::reflect::reflect_off_segment;
use super::state::{ChannelId, Segment, SimState};
use crate::audio::{InstrumentId, Note};
use crate::settings::Settings;

/// One resolved bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub ball_id: u32,
    /// Index into `SimState::segments`
    pub segment: usize,
    pub channel: ChannelId,
    /// Ball speed at impact (unchanged by the bounce)
    pub speed: f32,
    pub segment_length: f32,
    /// Note to sound, `None` if the segment's channel no longer exists
    pub note: Option<(InstrumentId, Note)>,
}

/// How far a point is from lying on the segment (0 = on it)
#[inline]
pub fn proximity_surplus(pos: Vec2, seg: &Segment) -> f32 {
    distance(pos, seg.p1) + distance(pos, seg.p2) - seg.length()
}

/// Whether a ball at `pos` touches the segment
#[inline]
pub fn ball_touches_segment(pos: Vec2, seg: &Segment, threshold: f32) -> bool {
    proximity_surplus(pos, seg) <= threshold
}

/// Test every ball against every segment, bouncing on contact
///
/// Balls outer, segments inner, container order. There is no early exit: a
/// bounce replaces the velocity seen by the remaining segments in the same
/// tick, so a ball near several segments bounces off each of them in turn.
pub fn resolve_collisions(state: &mut SimState, settings: &Settings) -> Vec<Bounce> {
    let mut bounces = Vec::new();

    for b in 0..state.balls.len() {
        for s in 0..state.segments.len() {
            let seg = state.segments[s];
            let pos = state.balls[b].pos;
            if !ball_touches_segment(pos, &seg, settings.collision_threshold) {
                continue;
            }

            let vel = state.balls[b].vel;
            let speed = vel.length();
            let segment_length = seg.length();

            let ball = &mut state.balls[b];
            ball.vel = reflect_off_segment(vel, seg.p1, seg.p2);
            ball.channel = Some(seg.channel);
            let ball_id = ball.id;

            let note = state.channel(seg.channel).map(|ch| {
                let input = PitchInput {
                    speed,
                    segment_length,
                    start_pitch: ch.start_pitch,
                    end_pitch: ch.end_pitch,
                    max_velocity: settings.max_velocity,
                };
                (ch.instrument, input)
            });
            let note = note.map(|(instrument, input)| {
                let index = map_pitch(settings.pitch_mode, &input, &mut state.rng);
                (instrument, Note(index))
            });

            if let Some((_, n)) = note {
                state.last_note = Some(n.index());
            }
            log::debug!(
                "ball {} bounced off segment {} at speed {:.3} -> {:?}",
                ball_id,
                s,
                speed,
                note.map(|(_, n)| n.label())
            );

            bounces.push(Bounce {
                ball_id,
                segment: s,
                channel: seg.channel,
                speed,
                segment_length,
                note,
            });
        }
    }

    bounces
}
