//! Held-key steering
//!
//! Turn keys are tracked as begin/end pairs and applied once per frame.

use serde::{Deserialize, Serialize};

use super::actor::ActorId;
use super::controller::PlaneController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

/// Turn state for one player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    left: bool,
    right: bool,
    turn_step: f32,
}

impl Steering {
    pub fn new(turn_step: f32) -> Self {
        Self {
            left: false,
            right: false,
            turn_step,
        }
    }

    pub fn begin(&mut self, turn: Turn) {
        self.set(turn, true);
    }

    pub fn end(&mut self, turn: Turn) {
        self.set(turn, false);
    }

    fn set(&mut self, turn: Turn, held: bool) {
        match turn {
            Turn::Left => self.left = held,
            Turn::Right => self.right = held,
        }
    }

    pub fn is_held(&self, turn: Turn) -> bool {
        match turn {
            Turn::Left => self.left,
            Turn::Right => self.right,
        }
    }

    /// Rotation for this frame; opposing keys cancel out
    pub fn rotation(&self) -> f32 {
        match (self.left, self.right) {
            (false, true) => self.turn_step,
            (true, false) => -self.turn_step,
            _ => 0.0,
        }
    }

    /// Call once per frame
    pub fn apply(&self, controller: &mut PlaneController<'_>) {
        let delta = self.rotation();
        if delta != 0.0 {
            controller.rotate(delta);
        }
    }

    /// Fire presses go straight through
    pub fn fire(&self, controller: &mut PlaneController<'_>) -> Option<ActorId> {
        controller.fire()
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self::new(crate::consts::TURN_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::actor::Player;
    use crate::sim::world::World;

    #[test]
    fn test_rotation_from_held_keys() {
        let mut steering = Steering::default();
        assert_eq!(steering.rotation(), 0.0);

        steering.begin(Turn::Right);
        assert_eq!(steering.rotation(), 2.0);

        steering.begin(Turn::Left);
        assert_eq!(steering.rotation(), 0.0);

        steering.end(Turn::Right);
        assert_eq!(steering.rotation(), -2.0);
        assert!(steering.is_held(Turn::Left));
        assert!(!steering.is_held(Turn::Right));

        steering.end(Turn::Left);
        assert_eq!(steering.rotation(), 0.0);
    }

    #[test]
    fn test_apply_rotates_every_frame() {
        let mut world = World::new(Settings::default());
        let start = world.plane(Player::Left).unwrap().rotation();

        let mut steering = Steering::default();
        steering.begin(Turn::Right);
        for _ in 0..3 {
            steering.apply(&mut world.controller(Player::Left));
        }
        let rotation = world.plane(Player::Left).unwrap().rotation();
        assert!((rotation - (start + 6.0)).abs() < 1e-4);
    }

    #[test]
    fn test_fire_forwards_to_controller() {
        let mut world = World::new(Settings::default());
        let steering = Steering::default();
        assert!(steering.fire(&mut world.controller(Player::Right)).is_some());
        assert_eq!(world.rocket_count(), 1);
    }
}
