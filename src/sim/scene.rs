//! Scene authoring: lines, droppers, edit-mode picking, channels
//!
//! Every operation here is a clamp-or-no-op; nothing can leave the scene
//! without a dropper or a channel, or with a zero-length segment.

use glam::Vec2;

use super::geometry::distance;
use super::state::{Channel, ChannelId, Dropper, Endpoint, Pick, Segment, SimState};
use crate::audio::InstrumentId;

/// Route a pointer click
///
/// A held pick is placed first; otherwise Shift selects edit mode and a plain
/// click draws lines.
pub fn click(state: &mut SimState, pos: Vec2, pick_radius: f32) {
    state.mouse_pos = pos;
    if state.pick.is_some() {
        place_pick(state, pos);
    } else if state.held_keys.shift() {
        edit_click(state, pos, pick_radius);
    } else {
        line_click(state, pos);
    }
}

/// Two-click line authoring
pub fn line_click(state: &mut SimState, pos: Vec2) {
    let Some(start) = state.draft else {
        state.draft = Some(pos);
        log::debug!("line started at ({}, {})", pos.x, pos.y);
        return;
    };

    // Same spot twice is not a line
    if start == pos {
        return;
    }

    let seg = Segment::new(start, pos, state.current_channel);
    log::debug!(
        "line created ({}, {}) -> ({}, {}) on channel {}",
        seg.p1.x,
        seg.p1.y,
        seg.p2.x,
        seg.p2.y,
        seg.channel
    );
    state.segments.push(seg);
    state.draft = None;
}

/// Shift-click: grab the nearest endpoint/dropper, or add a dropper
pub fn edit_click(state: &mut SimState, pos: Vec2, pick_radius: f32) {
    match find_pick(state, pos, pick_radius) {
        Some(pick) => {
            log::debug!("picked {pick:?}");
            state.pick = Some(pick);
        }
        None => {
            state.droppers.push(Dropper { pos });
            log::debug!("dropper added at ({}, {})", pos.x, pos.y);
        }
    }
}

/// Nearest pickable item within `radius`; segment endpoints win over droppers
pub fn find_pick(state: &SimState, pos: Vec2, radius: f32) -> Option<Pick> {
    let endpoint = state
        .segments
        .iter()
        .enumerate()
        .flat_map(|(i, seg)| {
            [Endpoint::P1, Endpoint::P2]
                .into_iter()
                .map(move |end| (i, end, distance(seg.endpoint(end), pos)))
        })
        .filter(|(_, _, d)| *d <= radius)
        .min_by(|a, b| a.2.total_cmp(&b.2));
    if let Some((segment, end, _)) = endpoint {
        return Some(Pick::Endpoint { segment, end });
    }

    state
        .droppers
        .iter()
        .enumerate()
        .map(|(i, d)| (i, distance(d.pos, pos)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| Pick::Dropper { index })
}

/// Track the pointer; a held pick follows it
pub fn mouse_move(state: &mut SimState, pos: Vec2) {
    state.mouse_pos = pos;
    if let Some(pick) = state.pick {
        state.pick = move_pick(state, pick, pos);
    }
}

/// Move a picked item, returning the pick that still refers to it
fn move_pick(state: &mut SimState, pick: Pick, pos: Vec2) -> Option<Pick> {
    match pick {
        Pick::Endpoint { segment, end } => {
            let seg = state.segments.get_mut(segment)?;
            *seg.endpoint_mut(end) = pos;
            let before = seg.p1;
            seg.canonicalize();
            // Dragged past the other end: the endpoints swapped roles
            let end = if seg.p1 != before {
                match end {
                    Endpoint::P1 => Endpoint::P2,
                    Endpoint::P2 => Endpoint::P1,
                }
            } else {
                end
            };
            Some(Pick::Endpoint { segment, end })
        }
        Pick::Dropper { index } => {
            state.droppers.get_mut(index)?.pos = pos;
            Some(pick)
        }
    }
}

/// Drop the held item at `pos`
pub fn place_pick(state: &mut SimState, pos: Vec2) {
    let Some(pick) = state.pick.take() else {
        return;
    };
    if move_pick(state, pick, pos).is_none() {
        return;
    }
    if let Pick::Endpoint { segment, .. } = pick {
        if state.segments[segment].length() == 0.0 {
            state.segments.remove(segment);
            log::debug!("segment {segment} collapsed to a point, removed");
        }
    }
}

/// Backspace: clear draft, else delete the held item, else pop the last line
pub fn backspace(state: &mut SimState) {
    if state.draft.take().is_some() {
        return;
    }

    match state.pick.take() {
        Some(Pick::Endpoint { segment, .. }) => {
            if segment < state.segments.len() {
                state.segments.remove(segment);
                log::debug!("segment {segment} deleted");
            }
        }
        Some(Pick::Dropper { index }) => {
            if state.droppers.len() > 1 && index < state.droppers.len() {
                state.droppers.remove(index);
                log::debug!("dropper {index} deleted");
            } else {
                log::warn!("Refusing to delete the last dropper");
            }
        }
        None => {
            if state.segments.pop().is_some() {
                log::debug!("last line removed");
            }
        }
    }
}

/// Shift+Backspace: remove the newest dropper, keeping at least one
pub fn pop_dropper(state: &mut SimState) {
    if state.droppers.len() <= 1 {
        log::warn!("Refusing to delete the last dropper");
        return;
    }
    state.droppers.pop();
    let remaining = state.droppers.len();
    if matches!(state.pick, Some(Pick::Dropper { index }) if index >= remaining) {
        state.pick = None;
    }
}

/// Make a channel current (unknown ids are ignored)
pub fn select_channel(state: &mut SimState, id: ChannelId) {
    if state.channel(id).is_some() {
        state.current_channel = id;
    }
}

/// Add a channel with the default note range and make it current
pub fn add_channel(state: &mut SimState, color: String, instrument: InstrumentId) -> ChannelId {
    let id = state.next_channel_id();
    state.channels.push(Channel::new(id, color, instrument));
    state.current_channel = id;
    log::debug!("channel {id} added");
    id
}

/// Delete the current channel and its lines; the last channel stays
pub fn delete_current_channel(state: &mut SimState) -> bool {
    if state.channels.len() <= 1 {
        log::warn!("Refusing to delete the last channel");
        return false;
    }

    let id = state.current_channel;
    state.channels.retain(|c| c.id != id);
    state.segments.retain(|s| s.channel != id);
    // Segment indices shifted
    state.pick = None;
    state.current_channel = state.channels[0].id;
    log::debug!("channel {id} deleted");
    true
}

pub fn set_channel_color(state: &mut SimState, color: String) {
    let id = state.current_channel;
    if let Some(ch) = state.channel_mut(id) {
        ch.color = color;
    }
}

pub fn set_channel_instrument(state: &mut SimState, instrument: InstrumentId) {
    let id = state.current_channel;
    if let Some(ch) = state.channel_mut(id) {
        ch.instrument = instrument;
    }
}

pub fn set_start_pitch(state: &mut SimState, pitch: u8) {
    let id = state.current_channel;
    if let Some(ch) = state.channel_mut(id) {
        ch.set_start_pitch(pitch);
    }
}

pub fn set_end_pitch(state: &mut SimState, pitch: u8) {
    let id = state.current_channel;
    if let Some(ch) = state.channel_mut(id) {
        ch.set_end_pitch(pitch);
    }
}

/// Move both bounds at once
///
/// Each bound clamps against the other, so a range moving up past the old
/// end has to move its end first.
pub fn set_pitch_range(state: &mut SimState, start: u8, end: u8) {
    let id = state.current_channel;
    if let Some(ch) = state.channel_mut(id) {
        if start > ch.end_pitch {
            ch.set_end_pitch(end);
            ch.set_start_pitch(start);
        } else {
            ch.set_start_pitch(start);
            ch.set_end_pitch(end);
        }
    }
}
