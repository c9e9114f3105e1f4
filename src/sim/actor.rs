//! Actors: planes, rockets and clouds
//!
//! Every actor shares one kinematic model. Orientation, speed and facing are
//! private so the velocity is always derived from them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionState, Animatable, RunningAction};
use super::kinematics::{Field, integrate, velocity_for};
use super::spatial::CircleShape;
use crate::consts::*;

/// Stable actor handle. Ids are never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Actor type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Plane,
    Rocket,
    Cloud,
}

impl ActorKind {
    pub const ALL: [ActorKind; 3] = [ActorKind::Plane, ActorKind::Rocket, ActorKind::Cloud];

    /// Collision radius
    pub fn radius(self) -> f32 {
        match self {
            ActorKind::Plane => PLANE_RADIUS,
            ActorKind::Rocket => ROCKET_RADIUS,
            ActorKind::Cloud => ACTOR_RADIUS,
        }
    }

    pub fn default_speed(self) -> f32 {
        match self {
            ActorKind::Plane => PLANE_SPEED,
            ActorKind::Rocket => ROCKET_SPEED,
            ActorKind::Cloud => CLOUD_BASE_SPEED,
        }
    }

    /// Sprite size at scale 1.0
    pub fn sprite_size(self) -> Vec2 {
        match self {
            ActorKind::Plane => PLANE_SIZE,
            ActorKind::Rocket => ROCKET_SIZE,
            ActorKind::Cloud => CLOUD_SIZE,
        }
    }

    /// Decorative actors keep drifting while their physics is off
    pub fn drifts(self) -> bool {
        matches!(self, ActorKind::Cloud)
    }
}

/// Player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Left,
    Right,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Left, Player::Right];

    pub fn index(self) -> usize {
        match self {
            Player::Left => 0,
            Player::Right => 1,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Left => Player::Right,
            Player::Right => Player::Left,
        }
    }
}

/// Position, orientation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

/// Per-kind state
#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Plane { player: Player, spawn: Pose },
    Rocket { expired: bool },
    Cloud,
}

/// A simulated entity
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    role: Role,
    position: Vec2,
    /// Degrees, 0 = facing +x
    rotation: f32,
    speed: f32,
    right_to_left: bool,
    velocity: Vec2,
    radius: f32,
    shape: CircleShape,
    scale: f32,
    opacity: f32,
    physics_enabled: bool,
    actions: Vec<RunningAction<Actor>>,
}

impl Actor {
    fn new(id: ActorId, role: Role, pose: Pose, speed: f32, right_to_left: bool) -> Self {
        let kind = match role {
            Role::Plane { .. } => ActorKind::Plane,
            Role::Rocket { .. } => ActorKind::Rocket,
            Role::Cloud => ActorKind::Cloud,
        };
        let radius = kind.radius();
        let mut actor = Self {
            id,
            role,
            position: pose.position,
            rotation: pose.rotation,
            speed,
            right_to_left,
            velocity: Vec2::ZERO,
            radius,
            shape: CircleShape::new(pose.position, radius),
            scale: pose.scale,
            opacity: 1.0,
            physics_enabled: true,
            actions: Vec::new(),
        };
        actor.update_velocity();
        actor
    }

    /// Player plane; the pose is remembered for respawning
    pub fn plane(id: ActorId, player: Player, spawn: Pose, right_to_left: bool) -> Self {
        Self::new(
            id,
            Role::Plane { player, spawn },
            spawn,
            ActorKind::Plane.default_speed(),
            right_to_left,
        )
    }

    pub fn rocket(id: ActorId, position: Vec2, rotation: f32) -> Self {
        let pose = Pose {
            position,
            rotation,
            scale: 1.0,
        };
        Self::new(
            id,
            Role::Rocket { expired: false },
            pose,
            ActorKind::Rocket.default_speed(),
            false,
        )
    }

    /// Decorative cloud; never collides
    pub fn cloud(id: ActorId, position: Vec2, speed: f32, scale: f32, right_to_left: bool) -> Self {
        let pose = Pose {
            position,
            rotation: 0.0,
            scale,
        };
        let mut cloud = Self::new(id, Role::Cloud, pose, speed, right_to_left);
        cloud.physics_enabled = false;
        cloud
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        match self.role {
            Role::Plane { .. } => ActorKind::Plane,
            Role::Rocket { .. } => ActorKind::Rocket,
            Role::Cloud => ActorKind::Cloud,
        }
    }

    /// Owning player, for planes
    pub fn player(&self) -> Option<Player> {
        match self.role {
            Role::Plane { player, .. } => Some(player),
            _ => None,
        }
    }

    /// Spawn pose, for planes
    pub fn spawn_pose(&self) -> Option<Pose> {
        match self.role {
            Role::Plane { spawn, .. } => Some(spawn),
            _ => None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn right_to_left(&self) -> bool {
        self.right_to_left
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Rendered size (sprite size times scale)
    pub fn extent(&self) -> Vec2 {
        self.kind().sprite_size() * self.scale
    }

    /// Last collision shape built by `update_shape`
    pub fn shape(&self) -> CircleShape {
        self.shape
    }

    /// Rocket whose lifetime has run out and is waiting to be freed
    pub fn is_expired(&self) -> bool {
        matches!(self.role, Role::Rocket { expired: true })
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.update_velocity();
    }

    pub fn rotate(&mut self, delta: f32) {
        self.set_rotation(self.rotation + delta);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.update_velocity();
    }

    pub fn set_right_to_left(&mut self, right_to_left: bool) {
        self.right_to_left = right_to_left;
        self.update_velocity();
    }

    pub fn set_physics(&mut self, enabled: bool) {
        self.physics_enabled = enabled;
    }

    fn update_velocity(&mut self) {
        self.velocity = velocity_for(self.rotation, self.speed, self.right_to_left);
    }

    /// Rebuild the collision circle from the current position
    pub fn update_shape(&mut self) -> CircleShape {
        self.shape = CircleShape::new(self.position, self.radius);
        self.shape
    }

    /// Reset a plane to its spawn pose
    pub fn respawn(&mut self) {
        if let Role::Plane { spawn, .. } = self.role {
            self.position = spawn.position;
            self.rotation = spawn.rotation;
            self.scale = spawn.scale;
            self.update_velocity();
        }
    }

    /// Flag a rocket for removal at the end of the action pass
    pub fn expire(&mut self) {
        if let Role::Rocket { expired } = &mut self.role {
            *expired = true;
        }
    }

    /// Move one step. Planes and rockets only move with physics on.
    pub fn advance(&mut self, dt: f32, field: &Field) {
        if !self.physics_enabled && !self.kind().drifts() {
            return;
        }
        self.position = integrate(self.position, self.velocity, dt, self.extent(), field);
    }

    /// Attach a program; instant effects at its head fire right away
    pub fn run(&mut self, action: &Action<Actor>) {
        let mut running = RunningAction::new(action);
        if running.step(0.0, self) != ActionState::Resolved {
            self.actions.push(running);
        }
    }

    /// Advance every attached program
    pub fn step_actions(&mut self, dt: f32) {
        let mut running = std::mem::take(&mut self.actions);
        for action in &mut running {
            action.step(dt, self);
        }
        running.retain(|a| !a.is_done());
        // Programs attached from inside a callback land in self.actions
        running.append(&mut self.actions);
        self.actions = running;
    }

    /// Drop all attached programs without running them
    pub fn stop_actions(&mut self) {
        self.actions.clear();
    }
}

impl Animatable for Actor {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> Pose {
        Pose {
            position: Vec2::new(50.0, 200.0),
            rotation: -20.0,
            scale: 1.0,
        }
    }

    #[test]
    fn test_velocity_follows_rotation() {
        let mut plane = Actor::plane(ActorId(1), Player::Left, spawn(), false);
        assert_eq!(plane.velocity(), velocity_for(-20.0, PLANE_SPEED, false));

        plane.rotate(20.0);
        assert_eq!(plane.rotation(), 0.0);
        assert!((plane.velocity() - Vec2::new(PLANE_SPEED, 0.0)).length() < 1e-4);

        plane.set_right_to_left(true);
        assert!((plane.velocity() - Vec2::new(-PLANE_SPEED, 0.0)).length() < 1e-3);

        plane.set_speed(50.0);
        assert!((plane.velocity().length() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_constructors_use_kind_speed() {
        let plane = Actor::plane(ActorId(1), Player::Left, spawn(), false);
        assert_eq!(plane.speed(), ActorKind::Plane.default_speed());

        let rocket = Actor::rocket(ActorId(2), Vec2::new(10.0, 300.0), 0.0);
        assert_eq!(rocket.speed(), ActorKind::Rocket.default_speed());
        assert_eq!(rocket.speed(), plane.speed() * 4.0);
    }

    #[test]
    fn test_respawn_restores_pose() {
        let mut plane = Actor::plane(ActorId(1), Player::Right, spawn(), true);
        let initial_velocity = plane.velocity();

        plane.set_position(Vec2::new(900.0, 40.0));
        plane.rotate(75.0);
        plane.set_scale(4.0);
        plane.respawn();

        assert_eq!(plane.pose(), spawn());
        assert_eq!(plane.velocity(), initial_velocity);
    }

    #[test]
    fn test_respawn_ignored_for_rockets() {
        let mut rocket = Actor::rocket(ActorId(2), Vec2::new(10.0, 300.0), 45.0);
        rocket.set_position(Vec2::new(20.0, 300.0));
        rocket.respawn();
        assert_eq!(rocket.position(), Vec2::new(20.0, 300.0));
    }

    #[test]
    fn test_clouds_drift_without_physics() {
        let field = Field::new(1200.0, 700.0);
        let mut cloud = Actor::cloud(ActorId(3), Vec2::new(600.0, 500.0), 64.0, 2.4, false);
        assert!(!cloud.physics_enabled());

        cloud.advance(0.5, &field);
        assert!((cloud.position().x - 632.0).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_plane_holds_position() {
        let field = Field::new(1200.0, 700.0);
        let mut plane = Actor::plane(ActorId(1), Player::Left, spawn(), false);
        plane.set_physics(false);
        plane.advance(1.0, &field);
        assert_eq!(plane.position(), spawn().position);

        plane.set_physics(true);
        plane.advance(1.0, &field);
        assert_ne!(plane.position(), spawn().position);
    }

    #[test]
    fn test_extent_scales_with_sprite() {
        let mut plane = Actor::plane(ActorId(1), Player::Left, spawn(), false);
        assert_eq!(plane.extent(), PLANE_SIZE);
        plane.set_scale(2.0);
        assert_eq!(plane.extent(), PLANE_SIZE * 2.0);
    }

    #[test]
    fn test_update_shape_tracks_position() {
        let mut rocket = Actor::rocket(ActorId(2), Vec2::new(10.0, 300.0), 0.0);
        rocket.set_position(Vec2::new(400.0, 320.0));
        let shape = rocket.update_shape();
        assert_eq!(shape.center, Vec2::new(400.0, 320.0));
        assert_eq!(shape.radius, ROCKET_RADIUS);
    }

    #[test]
    fn test_actions_run_and_detach() {
        let mut rocket = Actor::rocket(ActorId(2), Vec2::new(10.0, 300.0), 0.0);
        rocket.run(&Action::delay(1.0).then(Action::call(Actor::expire)));
        assert!(rocket.has_actions());

        rocket.step_actions(0.5);
        assert!(!rocket.is_expired());
        rocket.step_actions(0.5);
        assert!(rocket.is_expired());
        assert!(!rocket.has_actions());
    }

    #[test]
    fn test_instant_program_never_attaches() {
        let mut plane = Actor::plane(ActorId(1), Player::Left, spawn(), false);
        plane.run(&Action::call_with(Actor::set_physics, false));
        assert!(!plane.physics_enabled());
        assert!(!plane.has_actions());
    }

    #[test]
    fn test_stop_actions_cancels_callbacks() {
        let mut rocket = Actor::rocket(ActorId(2), Vec2::new(10.0, 300.0), 0.0);
        rocket.run(&Action::delay(1.0).then(Action::call(Actor::expire)));
        rocket.stop_actions();
        rocket.step_actions(2.0);
        assert!(!rocket.is_expired());
    }
}
