use nalgebra::{vector, Vector2};
use spacejam_simulator::collision::CollisionResolver;
use spacejam_simulator::color;
use spacejam_simulator::config::Config;
use spacejam_simulator::effect::EffectKind;
use spacejam_simulator::model;
use spacejam_simulator::physics::{BodyTag, Contact, Physics, RapierPhysics};
use spacejam_simulator::registry::Registry;
use spacejam_simulator::rocket::{Rocket, RocketId};
use spacejam_simulator::ship::{ShipId, Spaceship};
use test_log::test;

struct World {
    config: Config,
    registry: Registry,
    physics: RapierPhysics,
    resolver: CollisionResolver,
}

impl World {
    fn new() -> World {
        let config = Config::default();
        World {
            physics: RapierPhysics::new(&config),
            config,
            registry: Registry::new(),
            resolver: CollisionResolver::new(),
        }
    }

    fn ship(&mut self, position: Vector2<f64>) -> ShipId {
        let id = self.registry.next_ship_id();
        let ship = Spaceship::new(id, "test", color::from_u24(0x2d82f0), &self.config);
        self.physics.create_ship_body(
            ship.tag(),
            position,
            &model::spaceship(self.config.spaceship_size),
        );
        self.registry.ships.insert(id, ship);
        id
    }

    fn rocket(&mut self, shooter: ShipId, position: Vector2<f64>, velocity: Vector2<f64>) -> RocketId {
        let rocket = Rocket {
            id: self.registry.next_rocket_id(),
            shooter,
            color: color::from_u24(0xffbb00),
        };
        self.physics
            .create_rocket_body(rocket.tag(), position, velocity, self.config.rocket_radius);
        let id = rocket.id;
        self.registry.rockets.insert(id, rocket);
        id
    }

    fn contact(&mut self, a: BodyTag, b: BodyTag) {
        self.resolver.begin_contact(
            &mut self.registry,
            &self.physics,
            &self.config,
            Contact { a, b },
        );
    }

    fn remove_bodies(&mut self) -> Vec<ShipId> {
        self.resolver
            .remove_bodies(&mut self.registry, &mut self.physics)
    }

    fn health(&self, id: ShipId) -> f64 {
        self.registry.ships[&id].health()
    }

    fn explosions(&self, radius: f64) -> usize {
        self.registry
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::Explosion && e.radius == radius)
            .count()
    }
}

#[test]
fn test_rocket_ignores_own_hull() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let s2 = world.ship(vector![70.0, 50.0]);
    let rocket = world.rocket(s1, vector![30.0, 50.0], vector![25.0, 0.0]);

    world.contact(BodyTag::Rocket(rocket), BodyTag::Ship(s1));
    assert_eq!(world.health(s1), 100.0);
    assert!(world.resolver.pending().is_empty());
    assert!(world.registry.effects.is_empty());

    // The rocket still resolves against other bodies.
    world.contact(BodyTag::Ship(s2), BodyTag::Rocket(rocket));
    assert_eq!(world.health(s2), 80.0);
    assert!(world.resolver.is_pending(BodyTag::Rocket(rocket)));
    assert_eq!(world.explosions(world.config.impact_explosion_radius), 1);
    assert!(world.remove_bodies().is_empty());
    assert!(world.registry.rockets.is_empty());
}

#[test]
fn test_double_hit_destroys_once() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let s2 = world.ship(vector![70.0, 50.0]);
    world.registry.ships.get_mut(&s2).unwrap().damage(85.0);
    assert_eq!(world.health(s2), 15.0);
    let r1 = world.rocket(s1, vector![69.0, 50.0], vector![25.0, 0.0]);
    let r2 = world.rocket(s1, vector![69.0, 51.0], vector![25.0, 0.0]);

    world.contact(BodyTag::Rocket(r1), BodyTag::Ship(s2));
    world.contact(BodyTag::Rocket(r2), BodyTag::Ship(s2));

    assert_eq!(world.health(s2), 0.0);
    assert!(world.registry.ships[&s2].is_destroyed());
    assert_eq!(world.explosions(world.config.destruction_explosion_radius), 1);
    assert!(world.resolver.is_pending(BodyTag::Ship(s2)));
    assert!(world.resolver.is_pending(BodyTag::Rocket(r1)));
    assert!(world.resolver.is_pending(BodyTag::Rocket(r2)));

    assert_eq!(world.remove_bodies(), vec![s2]);
    assert!(world.remove_bodies().is_empty());
    assert!(world.physics.body_state(BodyTag::Ship(s2)).is_none());
}

#[test]
fn test_spent_rocket_does_not_hit_again() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let s2 = world.ship(vector![70.0, 50.0]);
    let s3 = world.ship(vector![70.0, 55.0]);
    let rocket = world.rocket(s1, vector![69.0, 52.0], vector![25.0, 0.0]);

    world.contact(BodyTag::Rocket(rocket), BodyTag::Ship(s2));
    world.contact(BodyTag::Rocket(rocket), BodyTag::Ship(s3));
    assert_eq!(world.health(s2), 80.0);
    assert_eq!(world.health(s3), 100.0);
}

#[test]
fn test_rockets_from_different_shooters() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let s2 = world.ship(vector![70.0, 50.0]);
    let r1 = world.rocket(s1, vector![50.0, 50.0], vector![25.0, 0.0]);
    let r2 = world.rocket(s2, vector![50.5, 50.0], vector![-25.0, 0.0]);

    world.contact(BodyTag::Rocket(r1), BodyTag::Rocket(r2));

    assert!(world.resolver.is_pending(BodyTag::Rocket(r1)));
    assert!(world.resolver.is_pending(BodyTag::Rocket(r2)));
    // Still in the physics world until the removal pass.
    assert!(world.physics.body_state(BodyTag::Rocket(r1)).is_some());
    assert!(world.physics.body_state(BodyTag::Rocket(r2)).is_some());
    assert_eq!(world.health(s1), 100.0);
    assert_eq!(world.health(s2), 100.0);

    world.remove_bodies();
    assert!(world.physics.body_state(BodyTag::Rocket(r1)).is_none());
    assert!(world.physics.body_state(BodyTag::Rocket(r2)).is_none());
    assert!(world.registry.rockets.is_empty());
}

#[test]
fn test_rockets_from_same_shooter() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let r1 = world.rocket(s1, vector![50.0, 50.0], vector![25.0, 0.0]);
    let r2 = world.rocket(s1, vector![50.5, 50.0], vector![25.0, 0.0]);

    world.contact(BodyTag::Rocket(r1), BodyTag::Rocket(r2));
    assert!(world.resolver.pending().is_empty());
}

#[test]
fn test_rocket_hits_border() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let rocket = world.rocket(s1, vector![99.0, 50.0], vector![25.0, 0.0]);

    world.contact(BodyTag::Border, BodyTag::Rocket(rocket));
    assert!(world.resolver.is_pending(BodyTag::Rocket(rocket)));
    world.remove_bodies();
    assert!(world.registry.rockets.is_empty());
}

#[test]
fn test_physics_reports_rocket_hit() {
    let mut world = World::new();
    let s1 = world.ship(vector![30.0, 50.0]);
    let s2 = world.ship(vector![50.0, 50.0]);
    world.rocket(s1, vector![30.0, 50.0], vector![25.0, 0.0]);

    for _ in 0..120 {
        for contact in world.physics.step() {
            world.contact(contact.a, contact.b);
        }
        world.remove_bodies();
    }

    assert_eq!(world.health(s1), 100.0);
    assert_eq!(world.health(s2), 80.0);
    assert!(world.registry.rockets.is_empty());
}
