//! The per-tick orchestrator.
//!
//! A tick runs in two phases over every live ship, in id order. The scan
//! phase regenerates energy, asks each pilot for a scan and resolves it
//! against the positions all ships had at the start of the tick. The action
//! phase hands each pilot its scan result and applies the returned action.
//! Scans, acceleration and shots are each paid for separately; anything the
//! ship cannot afford is dropped without charge.
use crate::collision::CollisionResolver;
use crate::config::Config;
use crate::effect::{Effect, EffectKind};
use crate::invoker::{self, PilotInvoker};
use crate::model;
use crate::physics::{Contact, Physics};
use crate::registry::Registry;
use crate::rng::{new_rng, SeededRng};
use crate::rocket::Rocket;
use crate::scan;
use crate::ship::{ShipId, Spaceship};
use nalgebra::{vector, Vector2, Vector4};
use rand::seq::SliceRandom;
use rand::Rng;
use spacejam_api::{clip, vec_from_angle, Location, PilotAction, ScanRequest, SpaceshipPilot, Vec2};
use std::collections::BTreeMap;

const SPAWN_ATTEMPTS: usize = 100;
const SCAN_FLASH_ALPHA: f32 = 0.3;

pub struct GameHandler {
    config: Config,
    registry: Registry,
    collisions: CollisionResolver,
    pilots: BTreeMap<ShipId, PilotInvoker>,
    rng: SeededRng,
    tick: u32,
}

impl GameHandler {
    pub fn new(config: Config) -> GameHandler {
        log::info!("seed {}", config.seed);
        let rng = new_rng(config.seed);
        GameHandler {
            config,
            registry: Registry::new(),
            collisions: CollisionResolver::new(),
            pilots: BTreeMap::new(),
            rng,
            tick: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn collisions(&self) -> &CollisionResolver {
        &self.collisions
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn ship(&self, id: ShipId) -> Option<&Spaceship> {
        self.registry.ships.get(&id)
    }

    /// Adds a ship at a random free position and starts its pilot.
    pub fn spawn_spaceship(
        &mut self,
        physics: &mut dyn Physics,
        pilot: Box<dyn SpaceshipPilot>,
        name: &str,
        color: Vector4<f32>,
    ) -> Result<ShipId, invoker::Error> {
        let position = self.random_spawn_position(physics);
        self.spawn_spaceship_at(physics, pilot, name, color, position)
    }

    pub fn spawn_spaceship_at(
        &mut self,
        physics: &mut dyn Physics,
        pilot: Box<dyn SpaceshipPilot>,
        name: &str,
        color: Vector4<f32>,
        position: Vector2<f64>,
    ) -> Result<ShipId, invoker::Error> {
        let invoker = PilotInvoker::spawn(
            name,
            pilot,
            self.config.pilot_timeout(),
            self.config.pilot_poll_interval(),
        )?;
        let id = self.registry.next_ship_id();
        let ship = Spaceship::new(id, name, color, &self.config);
        physics.create_ship_body(
            ship.tag(),
            position,
            &model::spaceship(self.config.spaceship_size),
        );
        log::info!("Spawned {} ({:?}) at {:?}", name, id, position);
        self.registry.ships.insert(id, ship);
        self.pilots.insert(id, invoker);
        Ok(id)
    }

    fn random_spawn_position(&mut self, physics: &dyn Physics) -> Vector2<f64> {
        let size = self.config.spaceship_size;
        let (lo, hi) = (size, self.config.field_size - size);
        let occupied: Vec<Vector2<f64>> = self
            .registry
            .ships
            .values()
            .filter_map(|ship| physics.body_state(ship.tag()))
            .map(|state| state.position)
            .collect();
        let mut position = vector![0.0, 0.0];
        for _ in 0..SPAWN_ATTEMPTS {
            position = vector![self.rng.gen_range(lo..hi), self.rng.gen_range(lo..hi)];
            if occupied.iter().all(|p| (p - position).norm() >= 2.0 * size) {
                break;
            }
        }
        position
    }

    /// Runs one tick.
    pub fn update(&mut self, physics: &mut dyn Physics) {
        let tick = self.tick;
        let ticks_per_second = self.config.ticks_per_second as f64;
        let locations: BTreeMap<ShipId, Location> = self
            .registry
            .ships
            .values()
            .filter(|ship| !ship.is_destroyed())
            .filter_map(|ship| {
                let state = physics.body_state(ship.tag())?;
                Some((
                    ship.id,
                    Location::new(state.position, state.velocity / ticks_per_second),
                ))
            })
            .collect();

        let mut located: BTreeMap<ShipId, Vec<Vec2>> = BTreeMap::new();
        for (&id, location) in locations.iter() {
            let found = self.scan_phase(id, location, &locations);
            located.insert(id, found);
        }

        for (&id, location) in locations.iter() {
            let found = located.remove(&id).unwrap_or_default();
            self.action_phase(physics, id, location, found);
        }

        if tick >= self.config.sudden_death_tick {
            for &id in locations.keys() {
                self.collisions.damage_ship(
                    &mut self.registry,
                    &*physics,
                    &self.config,
                    id,
                    self.config.sudden_death_damage,
                );
            }
        }

        self.tick += 1;
    }

    fn scan_phase(
        &mut self,
        id: ShipId,
        location: &Location,
        locations: &BTreeMap<ShipId, Location>,
    ) -> Vec<Vec2> {
        let Some(ship) = self.registry.ships.get_mut(&id) else {
            return vec![];
        };
        ship.fault = None;
        ship.add_energy(self.config.energy_regen);
        let (health, energy) = (ship.health(), ship.energy());
        let Some(pilot) = self.pilots.get_mut(&id) else {
            return vec![];
        };
        match pilot.prepare_scan(self.tick, *location, health, energy) {
            Ok(Some(request)) => self.resolve_scan(id, location, &request, locations),
            Ok(None) => vec![],
            Err(e) => {
                self.fault(id, &e);
                vec![]
            }
        }
    }

    fn resolve_scan(
        &mut self,
        id: ShipId,
        location: &Location,
        request: &ScanRequest,
        locations: &BTreeMap<ShipId, Location>,
    ) -> Vec<Vec2> {
        let cost = scan::scan_cost(request, self.config.scan_cost_factor);
        let Some(ship) = self.registry.ships.get_mut(&id) else {
            return vec![];
        };
        if !ship.use_energy(cost) {
            log::debug!("{} cannot afford a scan costing {:.2}", ship.name, cost);
            return vec![];
        }
        let mut color = ship.color;
        color.w = SCAN_FLASH_ALPHA;

        let candidates = locations
            .iter()
            .filter(|(other, _)| **other != id)
            .map(|(_, other)| other.position());
        let mut found = scan::locate_targets(location.position(), request, candidates);
        found.shuffle(&mut self.rng);

        self.registry.effects.push(Effect::new(
            EffectKind::ScanFlash {
                direction: request.direction(),
                angle: request.angle(),
            },
            location.position(),
            request.distance(),
            color,
            self.config.scan_flash_duration,
        ));
        found
    }

    fn action_phase(
        &mut self,
        physics: &mut dyn Physics,
        id: ShipId,
        location: &Location,
        found: Vec<Vec2>,
    ) {
        let Some(ship) = self.registry.ships.get(&id) else {
            return;
        };
        let (health, energy) = (ship.health(), ship.energy());
        let Some(pilot) = self.pilots.get_mut(&id) else {
            return;
        };
        match pilot.update(self.tick, *location, health, energy, found) {
            Ok(action) => self.apply_action(physics, id, location, &action),
            Err(e) => self.fault(id, &e),
        }
    }

    fn apply_action(
        &mut self,
        physics: &mut dyn Physics,
        id: ShipId,
        location: &Location,
        action: &PilotAction,
    ) {
        if let Some(acceleration) = action.acceleration {
            self.accelerate(physics, id, acceleration);
        }
        if let Some(angle) = action.shoot_angle {
            self.shoot(physics, id, location, angle);
        }
    }

    fn accelerate(&mut self, physics: &mut dyn Physics, id: ShipId, acceleration: Vec2) {
        let Some(ship) = self.registry.ships.get_mut(&id) else {
            return;
        };
        if !(acceleration.x.is_finite() && acceleration.y.is_finite()) {
            log::warn!("{}: dropping malformed acceleration {:?}", ship.name, acceleration);
            return;
        }
        let acceleration = clip(acceleration, self.config.max_acceleration);
        let cost = acceleration.norm() * self.config.move_cost_factor;
        if !ship.use_energy(cost) {
            log::debug!("{} cannot afford to accelerate for {:.2}", ship.name, cost);
            return;
        }
        physics.apply_velocity_delta(
            ship.tag(),
            acceleration * self.config.ticks_per_second as f64,
        );
    }

    fn shoot(&mut self, physics: &mut dyn Physics, id: ShipId, location: &Location, angle: f64) {
        let Some(ship) = self.registry.ships.get_mut(&id) else {
            return;
        };
        if !angle.is_finite() {
            log::warn!("{}: dropping malformed shoot angle {}", ship.name, angle);
            return;
        }
        if !ship.use_energy(self.config.shoot_cost) {
            log::debug!("{} cannot afford to shoot", ship.name);
            return;
        }
        let color = ship.color;
        let rocket = Rocket {
            id: self.registry.next_rocket_id(),
            shooter: id,
            color,
        };
        let velocity = vec_from_angle(angle)
            * self.config.rocket_speed
            * self.config.ticks_per_second as f64;
        physics.create_rocket_body(
            rocket.tag(),
            location.position(),
            velocity,
            self.config.rocket_radius,
        );
        self.registry.rockets.insert(rocket.id, rocket);
    }

    fn fault(&mut self, id: ShipId, error: &invoker::Error) {
        log::warn!("{}", error);
        if let Some(ship) = self.registry.ships.get_mut(&id) {
            ship.fault = Some(error.to_string());
        }
    }

    pub fn begin_contact(&mut self, physics: &dyn Physics, contact: Contact) {
        self.collisions
            .begin_contact(&mut self.registry, physics, &self.config, contact);
    }

    /// Removes everything destroyed since the last call and stops the pilots
    /// of removed ships.
    pub fn remove_bodies(&mut self, physics: &mut dyn Physics) -> Vec<ShipId> {
        let removed = self.collisions.remove_bodies(&mut self.registry, physics);
        for id in removed.iter() {
            self.pilots.remove(id);
        }
        removed
    }

    pub fn prune_effects(&mut self) {
        self.registry.prune_effects(self.config.tick_length());
    }
}
