//! Simulation context: owns every actor, the collision grid and the score.
//!
//! Frame order matters: kinematics, then actions, then the collision grid is
//! rebuilt and queried, then collision outcomes are dispatched.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::action::Action;
use super::actor::{Actor, ActorId, ActorKind, Player, Pose};
use super::controller::PlaneController;
use super::events::SimEvent;
use super::kinematics::Field;
use super::score::Score;
use super::spatial::CollisionGrid;
use crate::consts::*;
use crate::settings::Settings;

/// Explosion, pause, respawn, fade back in. Physics stays off throughout.
fn destroy_sequence() -> Action<Actor> {
    let explode = Action::scale_by(EXPLOSION_TIME, EXPLOSION_SCALE)
        .together(Action::fade_out(EXPLOSION_TIME));
    Action::call_with(Actor::set_physics, false).together(
        explode
            .then(Action::delay(RESPAWN_DELAY))
            .then(Action::call(Actor::respawn))
            .then(Action::fade_in(RESPAWN_FADE_IN))
            .then(Action::call_with(Actor::set_physics, true)),
    )
}

fn rocket_self_destruct() -> Action<Actor> {
    Action::delay(ROCKET_LIFETIME)
        .then(Action::fade_out(ROCKET_FADE))
        .then(Action::call(Actor::expire))
}

/// The dogfight
pub struct World {
    settings: Settings,
    field: Field,
    /// Sorted by id
    actors: Vec<Actor>,
    planes: [ActorId; 2],
    grid: CollisionGrid,
    score: Score,
    events: Vec<SimEvent>,
    time_ticks: u64,
    time: f32,
    next_id: u32,
    destroy_action: Action<Actor>,
    rocket_action: Action<Actor>,
}

impl World {
    /// Two planes at their spawn slots plus randomly placed clouds
    pub fn new(settings: Settings) -> Self {
        let field = settings.field();
        let max_radius = ActorKind::ALL
            .iter()
            .map(|k| k.radius())
            .fold(0.0, f32::max);

        let mut world = Self {
            grid: CollisionGrid::for_field(&field, max_radius),
            settings,
            field,
            actors: Vec::new(),
            planes: [ActorId(0); 2],
            score: Score::new(),
            events: Vec::new(),
            time_ticks: 0,
            time: 0.0,
            next_id: 1,
            destroy_action: destroy_sequence(),
            rocket_action: rocket_self_destruct(),
        };

        world.planes = [
            world.spawn_plane(Player::Left),
            world.spawn_plane(Player::Right),
        ];
        world.spawn_clouds();

        log::info!(
            "World {}x{} ready: {} actors, seed {}",
            field.width,
            field.height,
            world.actors.len(),
            world.settings.seed
        );
        world
    }

    fn next_actor_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_plane(&mut self, player: Player) -> ActorId {
        let s = &self.settings;
        let (x, rotation, right_to_left) = match player {
            Player::Left => (s.spawn_inset, -s.spawn_angle, false),
            Player::Right => (s.field_width - s.spawn_inset, s.spawn_angle, true),
        };
        let spawn = Pose {
            position: Vec2::new(x, s.spawn_height),
            rotation,
            scale: 1.0,
        };
        let id = self.next_actor_id();
        self.actors
            .push(Actor::plane(id, player, spawn, right_to_left));
        id
    }

    /// Higher clouds are bigger and faster (parallax)
    fn spawn_clouds(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.settings.seed);
        let max = self.settings.clouds_max;
        let min = self.settings.clouds_min.min(max);
        let count = rng.random_range(min..=max);

        for _ in 0..count {
            let h = rng.random::<f32>() * 0.6 + 0.4;
            let position = Vec2::new(
                self.field.width * rng.random::<f32>(),
                self.field.height * h,
            );
            let right_to_left = rng.random_bool(0.5);
            let id = self.next_actor_id();
            self.actors.push(Actor::cloud(
                id,
                position,
                ActorKind::Cloud.default_speed() * h * h,
                h * 3.0,
                right_to_left,
            ));
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn rocket_count(&self) -> usize {
        self.actors
            .iter()
            .filter(|a| a.kind() == ActorKind::Rocket)
            .count()
    }

    fn index_of(&self, id: ActorId) -> Option<usize> {
        self.actors.binary_search_by_key(&id, Actor::id).ok()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.index_of(id).map(|i| &self.actors[i])
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.index_of(id).map(move |i| &mut self.actors[i])
    }

    pub fn plane_id(&self, player: Player) -> ActorId {
        self.planes[player.index()]
    }

    pub fn plane(&self, player: Player) -> Option<&Actor> {
        self.actor(self.plane_id(player))
    }

    /// Steering and firing handle for one player
    pub fn controller(&mut self, player: Player) -> PlaneController<'_> {
        let plane = self.plane_id(player);
        PlaneController::new(self, plane)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Simulated seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fire a rocket from `plane`, offset along its flight direction so it
    /// clears the plane's own collision circle.
    pub fn create_rocket(&mut self, plane: ActorId) -> Option<ActorId> {
        let (position, rotation) = {
            let shooter = self.actor(plane)?;
            if shooter.kind() != ActorKind::Plane {
                return None;
            }
            let offset = shooter.velocity().normalize_or_zero()
                * (shooter.radius() + ROCKET_RADIUS)
                * ROCKET_SPAWN_MARGIN;
            let flip = if shooter.right_to_left() { 180.0 } else { 0.0 };
            (shooter.position() + offset, shooter.rotation() + flip)
        };

        let id = self.next_actor_id();
        let mut rocket = Actor::rocket(id, position, rotation);
        rocket.run(&self.rocket_action);
        // Ids only grow, so pushing keeps the list sorted
        self.actors.push(rocket);

        log::debug!("Rocket {:?} fired by {:?} at {}", id, plane, position);
        self.events.push(SimEvent::RocketFired { rocket: id, plane });
        Some(id)
    }

    /// Remove a rocket. Unknown ids and non-rockets are ignored.
    pub fn free_rocket(&mut self, rocket: ActorId) -> bool {
        let Some(index) = self.index_of(rocket) else {
            return false;
        };
        if self.actors[index].kind() != ActorKind::Rocket {
            return false;
        }
        // Dropping the actor drops its pending actions
        self.actors.remove(index);
        log::debug!("Rocket {:?} freed", rocket);
        self.events.push(SimEvent::RocketFreed { rocket });
        true
    }

    /// Advance the whole simulation by `dt` seconds
    pub fn step_frame(&mut self, dt: f32) {
        self.time_ticks += 1;
        self.time += dt;

        let field = self.field;
        for actor in &mut self.actors {
            actor.advance(dt, &field);
        }
        for actor in &mut self.actors {
            actor.step_actions(dt);
        }

        let expired: Vec<ActorId> = self
            .actors
            .iter()
            .filter(|a| a.is_expired())
            .map(Actor::id)
            .collect();
        for id in expired {
            self.free_rocket(id);
        }

        // Below ground counts as a hit without a shape test
        let ground = self.settings.ground_level;
        let mut hits = Vec::new();
        self.grid.clear();
        for actor in &mut self.actors {
            if !actor.physics_enabled() {
                continue;
            }
            if actor.position().y < ground {
                hits.push(actor.id());
            } else {
                let shape = actor.update_shape();
                self.grid.insert(actor.id(), shape);
            }
        }
        for (a, b) in self.grid.iter_all_collisions() {
            hits.push(a);
            hits.push(b);
        }

        let mut seen = HashSet::new();
        hits.retain(|id| seen.insert(*id));
        for id in hits {
            self.collision_action(id);
        }
    }

    fn collision_action(&mut self, id: ActorId) {
        let Some(kind) = self.actor(id).map(Actor::kind) else {
            return;
        };
        match kind {
            ActorKind::Rocket => {
                self.free_rocket(id);
            }
            ActorKind::Plane => self.destroy_plane(id),
            ActorKind::Cloud => {}
        }
    }

    fn destroy_plane(&mut self, id: ActorId) {
        let action = self.destroy_action.clone();
        let Some(plane) = self.actor_mut(id) else {
            return;
        };
        let Some(player) = plane.player() else {
            return;
        };
        plane.run(&action);

        self.score.award(player.opponent());
        log::info!("{:?} plane down, score {}", player, self.score.label());
        self.events.push(SimEvent::PlaneDestroyed { player });
        self.events.push(SimEvent::ScoreChanged { score: self.score });
    }
}
