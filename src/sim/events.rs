//! Events emitted by the simulation for the presentation layer

use serde::{Deserialize, Serialize};

use super::actor::{ActorId, Player};
use super::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RocketFired { rocket: ActorId, plane: ActorId },
    RocketFreed { rocket: ActorId },
    PlaneDestroyed { player: Player },
    /// The score label needs redrawing
    ScoreChanged { score: Score },
}
