use crate::color;
use crate::config::Config;
use crate::game::GameHandler;
use crate::invoker;
use crate::model;
use crate::physics::{Physics, RapierPhysics};
use crate::ship::ShipId;
use crate::snapshot::*;
use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};
use spacejam_api::SpaceshipPilot;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    Victory { ship: ShipId, name: String },
    Draw,
}

/// A round: the physics world plus the game logic driving it.
pub struct Simulation {
    physics: Box<dyn Physics>,
    game: GameHandler,
    steps: u32,
}

impl Simulation {
    pub fn new(config: Config) -> Simulation {
        let physics = Box::new(RapierPhysics::new(&config));
        Simulation::with_physics(config, physics)
    }

    pub fn with_physics(config: Config, physics: Box<dyn Physics>) -> Simulation {
        Simulation {
            physics,
            game: GameHandler::new(config),
            steps: 0,
        }
    }

    pub fn config(&self) -> &Config {
        self.game.config()
    }

    pub fn game(&self) -> &GameHandler {
        &self.game
    }

    pub fn physics(&self) -> &dyn Physics {
        self.physics.as_ref()
    }

    /// Physics steps run so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Game ticks run so far.
    pub fn tick(&self) -> u32 {
        self.game.tick()
    }

    pub fn time(&self) -> f64 {
        self.steps as f64 * self.config().physics_tick_length()
    }

    pub fn spawn_spaceship(
        &mut self,
        pilot: Box<dyn SpaceshipPilot>,
        name: &str,
        color: Vector4<f32>,
    ) -> Result<ShipId, invoker::Error> {
        self.game
            .spawn_spaceship(self.physics.as_mut(), pilot, name, color)
    }

    pub fn spawn_spaceship_at(
        &mut self,
        pilot: Box<dyn SpaceshipPilot>,
        name: &str,
        color: Vector4<f32>,
        position: Vector2<f64>,
    ) -> Result<ShipId, invoker::Error> {
        self.game
            .spawn_spaceship_at(self.physics.as_mut(), pilot, name, color, position)
    }

    /// Runs one physics step, resolves its contacts and, every
    /// `steps_per_tick` steps, one game tick.
    pub fn step(&mut self) {
        let contacts = self.physics.step();
        for contact in contacts {
            self.game.begin_contact(self.physics.as_ref(), contact);
        }

        if self.steps % self.config().steps_per_tick() == 0 {
            self.game.update(self.physics.as_mut());
            self.game.prune_effects();
        }

        self.game.remove_bodies(self.physics.as_mut());
        self.steps += 1;
    }

    pub fn status(&self) -> Status {
        let mut alive = self
            .game
            .registry()
            .ships
            .values()
            .filter(|ship| !ship.is_destroyed());
        match (alive.next(), alive.next()) {
            (None, _) => Status::Draw,
            (Some(ship), None) => Status::Victory {
                ship: ship.id,
                name: ship.name.clone(),
            },
            _ => Status::Running,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let config = self.config();
        let registry = self.game.registry();
        let hull = model::spaceship(config.spaceship_size);
        let mut snapshot = Snapshot {
            tick: self.tick(),
            time: self.time(),
            status: self.status(),
            field_size: config.field_size,
            ships: vec![],
            rockets: vec![],
            effects: vec![],
        };

        for ship in registry.ships.values() {
            let Some(state) = self.physics.body_state(ship.tag()) else {
                continue;
            };
            let color = if ship.fault.is_some() {
                color::FAULT_COLOR
            } else {
                color::to_u32(ship.color)
            };
            snapshot.ships.push(ShipSnapshot {
                id: ship.id,
                name: ship.name.clone(),
                position: state.position.into(),
                velocity: state.velocity,
                heading: state.heading,
                hull: hull.clone(),
                color,
                health: ship.health() / ship.max_health(),
                energy: ship.energy() / ship.max_energy(),
                fault: ship.fault.clone(),
            });
        }

        for rocket in registry.rockets.values() {
            let Some(state) = self.physics.body_state(rocket.tag()) else {
                continue;
            };
            snapshot.rockets.push(RocketSnapshot {
                id: rocket.id,
                shooter: rocket.shooter,
                position: state.position.into(),
                velocity: state.velocity,
                radius: config.rocket_radius,
                color: color::to_u32(rocket.color),
            });
        }

        for effect in registry.effects.iter() {
            snapshot.effects.push(EffectSnapshot {
                kind: effect.kind,
                position: effect.position.into(),
                radius: effect.radius,
                color: color::to_u32(effect.color),
                duration: effect.duration,
                progress: effect.progress(),
            });
        }

        snapshot
    }
}
