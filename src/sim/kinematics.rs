//! Actor kinematics: heading to velocity, position integration and the
//! field boundary policy.
//!
//! The field wraps horizontally (an endless flight corridor) and clamps
//! vertically (actors slide along the ceiling and floor).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{WRAP_ENTRY, WRAP_EXIT};
use crate::heading;

/// Play-field bounds, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Velocity for an orientation (degrees), scalar speed and facing flag.
///
/// Right-to-left actors fly 180° off their nominal orientation so that a
/// mirrored sprite with rotation 0 points toward -x.
#[inline]
pub fn velocity_for(rotation: f32, speed: f32, right_to_left: bool) -> Vec2 {
    let angle = if right_to_left { rotation + 180.0 } else { rotation };
    heading(angle) * speed
}

/// Wrap x around the horizontal edges.
///
/// `width` is the rendered sprite width; an actor has to be fully past the
/// edge (by 30%) before it reappears on the other side (40% out).
#[inline]
pub fn wrap_horizontal(x: f32, vx: f32, width: f32, field_width: f32) -> f32 {
    if vx < 0.0 && x < -WRAP_EXIT * width {
        field_width + WRAP_ENTRY * width
    } else if vx > 0.0 && x > field_width + WRAP_EXIT * width {
        -WRAP_ENTRY * width
    } else {
        x
    }
}

/// Clamp y so the sprite stays between floor and ceiling
#[inline]
pub fn clamp_vertical(y: f32, height: f32, field_height: f32) -> f32 {
    let half = height / 2.0;
    if y > field_height - half {
        field_height - half
    } else if y < half {
        half
    } else {
        y
    }
}

/// Advance a position by one step and apply the boundary policy.
///
/// `extent` is the rendered sprite size (width, height).
pub fn integrate(position: Vec2, velocity: Vec2, dt: f32, extent: Vec2, field: &Field) -> Vec2 {
    let moved = position + velocity * dt;
    let width = extent.x.abs();
    Vec2::new(
        wrap_horizontal(moved.x, velocity.x, width, field.width),
        clamp_vertical(moved.y, extent.y, field.height),
    )
}
