//! Per-player handle onto a plane

use super::actor::{Actor, ActorId};
use super::world::World;

/// Lets one player steer and fire their own plane and nothing else
pub struct PlaneController<'w> {
    world: &'w mut World,
    plane: ActorId,
}

impl<'w> PlaneController<'w> {
    pub(crate) fn new(world: &'w mut World, plane: ActorId) -> Self {
        Self { world, plane }
    }

    pub fn plane(&self) -> ActorId {
        self.plane
    }

    /// Turn by `delta` degrees. Allowed at any time, even mid-explosion.
    pub fn rotate(&mut self, delta: f32) {
        if let Some(plane) = self.world.actor_mut(self.plane) {
            plane.rotate(delta);
        }
    }

    /// Launch a rocket. Does nothing while the plane's physics is off.
    pub fn fire(&mut self) -> Option<ActorId> {
        let armed = self
            .world
            .actor(self.plane)
            .is_some_and(Actor::physics_enabled);
        if !armed {
            log::trace!("{:?} cannot fire right now", self.plane);
            return None;
        }
        self.world.create_rocket(self.plane)
    }
}
