//! Read-only view of a frame for the presentation layer

use serde::Serialize;

use super::action::Animatable;
use super::actor::{Actor, ActorId, ActorKind};
use super::score::Score;
use super::world::World;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub kind: ActorKind,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Mirror the sprite horizontally
    pub flip_x: bool,
}

impl From<&Actor> for ActorSnapshot {
    fn from(actor: &Actor) -> Self {
        let position = actor.position();
        Self {
            id: actor.id(),
            kind: actor.kind(),
            x: position.x,
            y: position.y,
            rotation: actor.rotation(),
            scale: actor.scale(),
            opacity: actor.opacity(),
            flip_x: actor.right_to_left(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub time: f32,
    pub score: Score,
    pub score_label: String,
    pub actors: Vec<ActorSnapshot>,
}

impl FrameSnapshot {
    pub fn from_world(world: &World) -> Self {
        let score = world.score();
        Self {
            tick: world.time_ticks(),
            time: world.time(),
            score,
            score_label: score.label(),
            actors: world.actors().iter().map(ActorSnapshot::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
