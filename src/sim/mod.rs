//! Deterministic simulation module
//!
//! All dogfight logic lives here:
//! - Fixed timestep, driven by the caller
//! - Seeded RNG only (scenery placement)
//! - Stable iteration order (by actor ID)
//! - No rendering or platform dependencies

pub mod action;
pub mod actor;
pub mod controller;
pub mod events;
pub mod input;
pub mod kinematics;
pub mod score;
pub mod snapshot;
pub mod spatial;
pub mod world;

pub use action::{Action, ActionState, Animatable, RunningAction};
pub use actor::{Actor, ActorId, ActorKind, Player, Pose};
pub use controller::PlaneController;
pub use events::SimEvent;
pub use input::{Steering, Turn};
pub use kinematics::Field;
pub use score::Score;
pub use snapshot::{ActorSnapshot, FrameSnapshot};
pub use spatial::{CircleShape, CollisionGrid};
pub use world::World;
