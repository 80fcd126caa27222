use crate::PilotContext;
use spacejam_api::prelude::*;

const APPROACH_SPEED: f64 = 5.0;
const PATROL_SPEED: f64 = 2.0;
const FIRE_INTERVAL: u32 = 6;

pub fn create(context: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Creeper::new(context))
}

/// Runs for the nearer side wall, then patrols up and down along it firing
/// across the field.
pub struct Creeper {
    field_size: f64,
    spaceship_size: f64,
    wall_x: f64,
    flies_left: bool,
    facing: f64,
    reached_wall: bool,
    patrols_up: bool,
}

impl Creeper {
    pub fn new(context: &PilotContext) -> Creeper {
        Creeper {
            field_size: context.field_size,
            spaceship_size: context.spaceship_size,
            wall_x: 0.0,
            flies_left: true,
            facing: 0.0,
            reached_wall: false,
            patrols_up: true,
        }
    }

    fn approach_velocity(&self) -> Vec2 {
        let sign = if self.flies_left { -1.0 } else { 1.0 };
        vec2(sign * APPROACH_SPEED, 0.0)
    }

    fn decide_side(&mut self, position: Vec2, action: &mut PilotAction) {
        if position.x < self.field_size / 2.0 {
            self.wall_x = self.spaceship_size;
            self.flies_left = true;
            self.facing = 0.0;
        } else {
            self.wall_x = self.field_size - self.spaceship_size;
            self.flies_left = false;
            self.facing = PI;
        }
        action.accelerate(self.approach_velocity());
    }

    fn at_wall(&self, position: Vec2) -> bool {
        if self.flies_left {
            position.x < self.wall_x
        } else {
            position.x > self.wall_x
        }
    }

    fn patrol(&mut self, position: Vec2, velocity: Vec2, action: &mut PilotAction) {
        let (turn, goal) = if self.patrols_up {
            (
                position.y > self.field_size - self.spaceship_size,
                vec2(0.0, PATROL_SPEED),
            )
        } else {
            (position.y < self.spaceship_size, vec2(0.0, -PATROL_SPEED))
        };
        if turn {
            self.patrols_up = !self.patrols_up;
            return;
        }
        let correction = goal - velocity;
        if correction.length() > 0.1 {
            action.accelerate(correction);
        }
    }
}

impl SpaceshipPilot for Creeper {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, tick: u32, location: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        let position = location.position();
        let velocity = location.velocity();

        if tick == 0 {
            self.decide_side(position, &mut action);
            return Ok(action);
        }

        if !self.reached_wall {
            if self.at_wall(position) {
                self.reached_wall = true;
            } else {
                if velocity.length() < APPROACH_SPEED {
                    action.accelerate(self.approach_velocity() - velocity);
                }
                return Ok(action);
            }
        }

        self.patrol(position, velocity, &mut action);
        if tick % FIRE_INTERVAL == 0 {
            action.shoot(self.facing);
        }
        Ok(action)
    }
}
