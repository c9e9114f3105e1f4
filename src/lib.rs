//! Sky Duel - A two-player arcade dogfight
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (kinematics, collisions, timed actions, scoring)
//! - `settings`: Data-driven match configuration

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep used by the native shell (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Play-field dimensions (y grows upward)
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 700.0;
    /// Anything below this height counts as a crash
    pub const GROUND_LEVEL: f32 = 150.0;

    /// Generic actor collision radius
    pub const ACTOR_RADIUS: f32 = 20.0;

    /// Plane defaults
    pub const PLANE_RADIUS: f32 = 40.0;
    pub const PLANE_SPEED: f32 = 100.0;
    pub const PLANE_SIZE: Vec2 = Vec2::new(110.0, 44.0);

    /// Rocket defaults
    pub const ROCKET_RADIUS: f32 = 10.0;
    pub const ROCKET_SPEED: f32 = PLANE_SPEED * 4.0;
    pub const ROCKET_SIZE: Vec2 = Vec2::new(36.0, 12.0);
    /// Spawn distance multiplier so a fresh rocket clears its own plane
    pub const ROCKET_SPAWN_MARGIN: f32 = 1.4;
    /// Seconds of full-opacity flight before the rocket starts fading
    pub const ROCKET_LIFETIME: f32 = 2.0;
    pub const ROCKET_FADE: f32 = 1.0;

    /// Cloud defaults (scale 1.0)
    pub const CLOUD_SIZE: Vec2 = Vec2::new(80.0, 40.0);
    /// Speed of a cloud at the very top of the field
    pub const CLOUD_BASE_SPEED: f32 = 100.0;

    /// Destroy sequence timings
    pub const EXPLOSION_TIME: f32 = 0.2;
    pub const EXPLOSION_SCALE: f32 = 4.0;
    pub const RESPAWN_DELAY: f32 = 0.5;
    pub const RESPAWN_FADE_IN: f32 = 0.2;

    /// Collision grid cell size relative to the largest actor radius
    pub const GRID_CELL_FACTOR: f32 = 1.25;

    /// Horizontal wrap margins (fractions of the sprite width)
    pub const WRAP_EXIT: f32 = 0.3;
    pub const WRAP_ENTRY: f32 = 0.4;

    /// Degrees of rotation per frame while a turn key is held
    pub const TURN_STEP: f32 = 2.0;
}

/// Unit heading for an angle in degrees (0 = +x, positive turns clockwise)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}
