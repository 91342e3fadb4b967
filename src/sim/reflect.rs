//! Angle-based reflection off a straight segment
//!
//! The incoming direction is reversed, the segment normal facing the ball is
//! chosen from the sign of that reversed angle, and the reversed direction is
//! mirrored about the normal. Speed is kept exactly (no restitution).

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use super::geometry::{angle_of, from_angle};

/// Velocity after bouncing off the segment `p1`-`p2`
///
/// A zero velocity goes through the same arithmetic (`atan2(0, 0) == 0`) and
/// comes back as zero.
pub fn reflect_off_segment(vel: Vec2, p1: Vec2, p2: Vec2) -> Vec2 {
    let line_angle = angle_of(p2 - p1);

    // Reverse the direction of travel
    let mut ball_angle = angle_of(vel);
    if ball_angle <= 0.0 {
        ball_angle += PI;
    } else {
        ball_angle -= PI;
    }

    let line_normal = if ball_angle <= 0.0 {
        line_angle - FRAC_PI_2
    } else {
        line_angle + FRAC_PI_2
    };

    let reflection_angle = 2.0 * line_normal - ball_angle;
    from_angle(reflection_angle, vel.length())
}
