//! Planar geometry helpers
//!
//! Canvas space: x grows right, y grows down. All angles are `atan2` radians.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Direction angle of a vector (`atan2(y, x)`)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Order two points so the left one comes first (ties keep input order)
#[inline]
pub fn order_by_x(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    if a.x > b.x { (b, a) } else { (a, b) }
}

/// Vector of the given length pointing along `angle`
#[inline]
pub fn from_angle(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.cos() * length, angle.sin() * length)
}
