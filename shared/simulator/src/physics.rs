//! The physics collaborator.
//!
//! The engine only creates and destroys bodies, nudges their velocity and
//! reads their state back. Contacts are reported after a step completes,
//! identified by the [`BodyTag`] attached to each collider.
use crate::config::Config;
use crate::rocket::RocketId;
use crate::ship::ShipId;
use crossbeam::channel::{Receiver, Sender};
use nalgebra::{Point2, Vector2};
use rapier2d_f64::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WALL_THICKNESS: f64 = 10.0;
const SHIP_DENSITY: f64 = 2.0;
const ROCKET_MASS: f64 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Ship(ShipId),
    Rocket(RocketId),
    Border,
}

impl BodyTag {
    const SHIP: u128 = 1 << 64;
    const ROCKET: u128 = 2 << 64;

    pub fn to_user_data(self) -> u128 {
        match self {
            BodyTag::Border => 0,
            BodyTag::Ship(id) => BodyTag::SHIP | id.0 as u128,
            BodyTag::Rocket(id) => BodyTag::ROCKET | id.0 as u128,
        }
    }

    pub fn from_user_data(data: u128) -> Option<BodyTag> {
        let id = data as u64;
        match data & !(u64::MAX as u128) {
            0 if id == 0 => Some(BodyTag::Border),
            BodyTag::SHIP => Some(BodyTag::Ship(ShipId(id))),
            BodyTag::ROCKET => Some(BodyTag::Rocket(RocketId(id))),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vector2<f64>,
    /// Velocity in field units per second.
    pub velocity: Vector2<f64>,
    pub heading: f64,
}

/// Two bodies began touching.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyTag,
    pub b: BodyTag,
}

pub trait Physics {
    fn create_ship_body(&mut self, tag: BodyTag, position: Vector2<f64>, hull: &[Vector2<f64>]);

    fn create_rocket_body(
        &mut self,
        tag: BodyTag,
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        radius: f64,
    );

    /// Returns false if no body has this tag.
    fn destroy_body(&mut self, tag: BodyTag) -> bool;

    /// Adds `dv` (units per second) to the body's velocity.
    fn apply_velocity_delta(&mut self, tag: BodyTag, dv: Vector2<f64>) -> bool;

    fn body_state(&self, tag: BodyTag) -> Option<BodyState>;

    /// Advances one physics step and returns the contacts that began during it.
    fn step(&mut self) -> Vec<Contact>;
}

pub struct RapierPhysics {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    event_collector: CollisionEventHandler,
    contact_recv: Receiver<CollisionEvent>,
    handles: BTreeMap<BodyTag, RigidBodyHandle>,
}

impl RapierPhysics {
    pub fn new(config: &Config) -> RapierPhysics {
        let (contact_send, contact_recv) = crossbeam::channel::unbounded();
        let mut physics = RapierPhysics {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            integration_parameters: IntegrationParameters {
                dt: config.physics_tick_length(),
                max_ccd_substeps: 2,
                ..Default::default()
            },
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            event_collector: CollisionEventHandler::new(contact_send),
            contact_recv,
            handles: BTreeMap::new(),
        };
        physics.add_walls(config.field_size);
        physics
    }

    /// Encloses `[0, size]²` with four fixed walls lying just outside it.
    fn add_walls(&mut self, size: f64) {
        let half = size / 2.0;
        let offset = half + WALL_THICKNESS / 2.0;
        let edges = [
            (vector![half, -WALL_THICKNESS / 2.0], half + WALL_THICKNESS, WALL_THICKNESS / 2.0),
            (vector![half, size + WALL_THICKNESS / 2.0], half + WALL_THICKNESS, WALL_THICKNESS / 2.0),
            (vector![half - offset, half], WALL_THICKNESS / 2.0, half + WALL_THICKNESS),
            (vector![half + offset, half], WALL_THICKNESS / 2.0, half + WALL_THICKNESS),
        ];
        for (translation, hx, hy) in edges {
            let rigid_body = RigidBodyBuilder::fixed().translation(translation).build();
            let body_handle = self.bodies.insert(rigid_body);
            let collider = ColliderBuilder::cuboid(hx, hy)
                .user_data(BodyTag::Border.to_user_data())
                .build();
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        }
    }

    fn insert(&mut self, tag: BodyTag, rigid_body: RigidBody, collider: Collider) {
        if self.handles.contains_key(&tag) {
            log::warn!("Replacing existing body for {:?}", tag);
            self.destroy_body(tag);
        }
        let body_handle = self.bodies.insert(rigid_body);
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.handles.insert(tag, body_handle);
    }

    fn tag_of(&self, handle: ColliderHandle) -> Option<BodyTag> {
        self.colliders
            .get(handle)
            .and_then(|collider| BodyTag::from_user_data(collider.user_data))
    }
}

impl Physics for RapierPhysics {
    fn create_ship_body(&mut self, tag: BodyTag, position: Vector2<f64>, hull: &[Vector2<f64>]) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(position)
            .linear_damping(0.0)
            .ccd_enabled(true)
            .build();
        let points: Vec<Point2<f64>> = hull.iter().map(|&v| Point2::from(v)).collect();
        let radius = hull.iter().map(|v| v.norm()).fold(0.0, f64::max);
        let builder = ColliderBuilder::convex_hull(&points).unwrap_or_else(|| {
            log::warn!("Degenerate hull for {:?}, using a ball", tag);
            ColliderBuilder::ball(radius.max(0.1))
        });
        let collider = builder
            .density(SHIP_DENSITY)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(tag.to_user_data())
            .build();
        self.insert(tag, rigid_body, collider);
    }

    fn create_rocket_body(
        &mut self,
        tag: BodyTag,
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        radius: f64,
    ) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(position)
            .linvel(velocity)
            .additional_mass(ROCKET_MASS)
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(tag.to_user_data())
            .build();
        self.insert(tag, rigid_body, collider);
    }

    fn destroy_body(&mut self, tag: BodyTag) -> bool {
        match self.handles.remove(&tag) {
            Some(handle) => self
                .bodies
                .remove(
                    handle,
                    &mut self.island_manager,
                    &mut self.colliders,
                    &mut self.impulse_joints,
                    &mut self.multibody_joints,
                    true,
                )
                .is_some(),
            None => false,
        }
    }

    fn apply_velocity_delta(&mut self, tag: BodyTag, dv: Vector2<f64>) -> bool {
        let Some(body) = self.handles.get(&tag).and_then(|&h| self.bodies.get_mut(h)) else {
            return false;
        };
        let velocity = body.linvel() + dv;
        body.set_linvel(velocity, true);
        true
    }

    fn body_state(&self, tag: BodyTag) -> Option<BodyState> {
        let body = self.bodies.get(*self.handles.get(&tag)?)?;
        Some(BodyState {
            position: *body.translation(),
            velocity: *body.linvel(),
            heading: body.rotation().angle(),
        })
    }

    fn step(&mut self) -> Vec<Contact> {
        let gravity = vector![0.0, 0.0];
        let physics_hooks = ();
        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &physics_hooks,
            &self.event_collector,
        );

        let mut contacts = vec![];
        while let Ok(event) = self.contact_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                if let (Some(a), Some(b)) = (self.tag_of(h1), self.tag_of(h2)) {
                    contacts.push(Contact { a, b });
                }
            }
        }
        contacts
    }
}

pub struct CollisionEventHandler {
    collision_event_sender: Sender<CollisionEvent>,
}

impl CollisionEventHandler {
    pub fn new(collision_event_sender: Sender<CollisionEvent>) -> CollisionEventHandler {
        CollisionEventHandler {
            collision_event_sender,
        }
    }
}

impl EventHandler for CollisionEventHandler {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let _ = self.collision_event_sender.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f64,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f64,
    ) {
    }
}
