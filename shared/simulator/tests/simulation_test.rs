use nalgebra::vector;
use rand::Rng;
use spacejam_api::prelude::*;
use spacejam_simulator::color;
use spacejam_simulator::config::Config;
use spacejam_simulator::rng::{new_rng, SeededRng};
use spacejam_simulator::simulation::{Simulation, Status};
use test_log::test;

struct Idle;

impl SpaceshipPilot for Idle {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, _: u32, _: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        Ok(PilotAction::new())
    }
}

struct ShootOnce {
    angle: f64,
}

impl SpaceshipPilot for ShootOnce {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, tick: u32, _: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        if tick == 0 {
            action.shoot(self.angle);
        }
        Ok(action)
    }
}

struct Wanderer {
    rng: SeededRng,
}

impl SpaceshipPilot for Wanderer {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(Some(ScanRequest::new(self.rng.gen_range(-PI..PI), 30.0, PI / 3.0)?))
    }

    fn update(&mut self, _: u32, location: &Location, _: f64, _: f64, located: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        if location.velocity().length() < 3.0 {
            action.move_spaceship(self.rng.gen_range(-PI..PI), 2.0);
        }
        if let Some(&target) = located.first() {
            action.shoot(angle_between(location.position(), target));
        }
        Ok(action)
    }
}

fn white() -> nalgebra::Vector4<f32> {
    color::from_u24(0xffffff)
}

#[test]
fn test_rocket_hit() {
    let mut sim = Simulation::new(Config::default());
    let shooter = sim
        .spawn_spaceship_at(Box::new(ShootOnce { angle: 0.0 }), "shooter", white(), vector![30.0, 50.0])
        .unwrap();
    let target = sim
        .spawn_spaceship_at(Box::new(Idle), "target", white(), vector![60.0, 50.0])
        .unwrap();

    for _ in 0..120 {
        sim.step();
    }

    let game = sim.game();
    assert_eq!(game.ship(shooter).unwrap().health(), 100.0);
    assert_eq!(game.ship(target).unwrap().health(), 80.0);
    assert!(game.registry().rockets.is_empty());
    assert_eq!(sim.tick(), 10);
    assert_eq!(sim.status(), Status::Running);
}

#[test]
fn test_status() {
    let mut sim = Simulation::new(Config::default());
    assert_eq!(sim.status(), Status::Draw);
    let id = sim.spawn_spaceship(Box::new(Idle), "lonely", white()).unwrap();
    assert_eq!(
        sim.status(),
        Status::Victory {
            ship: id,
            name: "lonely".to_string()
        }
    );
    sim.spawn_spaceship(Box::new(Idle), "company", white()).unwrap();
    assert_eq!(sim.status(), Status::Running);
}

#[test]
fn test_sudden_death_draw() {
    let config = Config {
        sudden_death_tick: 0,
        sudden_death_damage: 25.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(config);
    sim.spawn_spaceship(Box::new(Idle), "a", white()).unwrap();
    sim.spawn_spaceship(Box::new(Idle), "b", white()).unwrap();

    while sim.status() == Status::Running && sim.steps() < 1000 {
        sim.step();
    }
    assert_eq!(sim.status(), Status::Draw);
    // Four ticks of chip damage, on steps 0, 12, 24 and 36.
    assert_eq!(sim.steps(), 37);
    assert!(sim.game().registry().ships.is_empty());
}

#[test]
fn test_ships_stay_in_field() {
    let config = Config {
        seed: 7,
        ..Default::default()
    };
    let mut sim = Simulation::new(config);
    for i in 0..6 {
        sim.spawn_spaceship(Box::new(Wanderer { rng: new_rng(i) }), "wanderer", white())
            .unwrap();
    }

    for _ in 0..600 {
        sim.step();
        let size = sim.config().field_size;
        for ship in sim.snapshot().ships {
            assert!(ship.position.x >= 0.0 && ship.position.x <= size, "{:?}", ship.position);
            assert!(ship.position.y >= 0.0 && ship.position.y <= size, "{:?}", ship.position);
            assert!(ship.health >= 0.0 && ship.health <= 1.0);
            assert!(ship.energy >= 0.0 && ship.energy <= 1.0);
        }
    }
}

struct Crashing;

impl SpaceshipPilot for Crashing {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, _: u32, _: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        Err("out of fuel".into())
    }
}

#[test]
fn test_snapshot() {
    let mut sim = Simulation::new(Config::default());
    let crashing = sim
        .spawn_spaceship_at(Box::new(Crashing), "crashing", white(), vector![20.0, 20.0])
        .unwrap();
    let shooter = sim
        .spawn_spaceship_at(Box::new(ShootOnce { angle: PI / 2.0 }), "shooter", white(), vector![80.0, 20.0])
        .unwrap();
    sim.step();

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.tick, 1);
    assert_eq!(snapshot.ships.len(), 2);
    let faulted = snapshot.ships.iter().find(|s| s.id == crashing).unwrap();
    assert_eq!(faulted.color, color::FAULT_COLOR);
    assert!(faulted.fault.as_ref().unwrap().contains("out of fuel"));
    let healthy = snapshot.ships.iter().find(|s| s.id == shooter).unwrap();
    assert_eq!(healthy.color, 0xffffffff);
    assert_eq!(healthy.hull.len(), 4);
    assert_eq!(snapshot.rockets.len(), 1);
    assert_eq!(snapshot.rockets[0].shooter, shooter);
    approx::assert_abs_diff_eq!(healthy.energy, 0.9, epsilon = 1e-9);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"crashing\""));
}
