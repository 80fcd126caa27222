use crate::PilotContext;
use spacejam_api::prelude::*;

const SPEED: f64 = 5.0;
const ROCKET_SPEED: f64 = 5.0;
const MAX_SCAN_DISTANCE: f64 = 50.0;
const STEERING_TICKS: u32 = 15;

pub fn create(context: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Batman::new(context))
}

/// Camps in the nearest corner and sweeps the field with narrow scans that
/// reach further out on every pass, firing with lead at whatever it finds.
pub struct Batman {
    ship_size: f64,
    field_size: f64,
    energy_regen: f64,
    scan_cost_factor: f64,
    mid: Vec2,
    corner: Vec2,
    steering_to_corner: bool,
    scanning: bool,
    start_scan_direction: f64,
    scan_direction: f64,
    scan_angle: f64,
    scan_distance: f64,
    scan_count: u32,
    last_sighting: Option<(u32, Vec2)>,
}

impl Batman {
    pub fn new(context: &PilotContext) -> Batman {
        let mid = vec2(context.field_size / 2.0, context.field_size / 2.0);
        Batman {
            ship_size: context.spaceship_size,
            field_size: context.field_size,
            energy_regen: context.energy_regen,
            scan_cost_factor: context.scan_cost_factor,
            mid,
            corner: vec2(0.0, 0.0),
            steering_to_corner: true,
            scanning: false,
            start_scan_direction: 0.0,
            scan_direction: 0.0,
            scan_angle: PI / 6.0,
            scan_distance: 20.0,
            scan_count: 0,
            last_sighting: None,
        }
    }

    fn decide_corner(&mut self, position: Vec2, action: &mut PilotAction) {
        self.corner = vec2(
            if position.x > self.field_size / 2.0 { self.field_size } else { 0.0 },
            if position.y > self.field_size / 2.0 { self.field_size } else { 0.0 },
        );
        move_towards(self.corner, position, vec2(0.0, 0.0), action);
        self.start_scan_direction = angle_between(self.corner, self.mid) - 0.25 * PI;
        self.scan_direction = self.start_scan_direction;
    }

    fn steer_to_corner(&mut self, position: Vec2, velocity: Vec2, action: &mut PilotAction) {
        if (self.corner - position).length() < self.ship_size {
            self.steering_to_corner = false;
            action.shoot(angle_between(position, self.mid));
            return;
        }
        if velocity.length() < SPEED {
            move_towards(self.corner, position, velocity, action);
        }
    }

    fn stay_in_corner(&self, position: Vec2, velocity: Vec2, action: &mut PilotAction) {
        let offset = self.corner - position;
        if offset.length() > 2.0 * self.ship_size {
            move_towards(self.corner, position, velocity, action);
        }
        if velocity.length() > 0.0 && offset.angle(&velocity) > PI / 2.0 {
            action.accelerate(-velocity);
        }
    }

    fn next_scan(&mut self) -> Result<ScanRequest, ScanValidationError> {
        let sweep_done = self.scan_count as f64 > (0.5 * PI / self.scan_angle).ceil();
        if sweep_done {
            if self.scan_distance < MAX_SCAN_DISTANCE {
                self.scan_distance += 5.0;
                // Largest sector two ticks of regeneration pay for.
                let affordable = 2.0 * self.energy_regen
                    / (self.scan_distance * self.scan_distance * self.scan_cost_factor);
                self.scan_angle = (0.75 * affordable).min(TAU);
            }
            self.scan_count = 0;
            self.scan_direction = self.start_scan_direction - 0.5 * self.scan_angle;
        }
        self.scan_direction += 0.75 * self.scan_angle;
        self.scan_count += 1;
        ScanRequest::new(self.scan_direction, self.scan_distance, self.scan_angle)
    }

    fn fire_at(&mut self, tick: u32, position: Vec2, target: Vec2, action: &mut PilotAction) {
        let velocity = match self.last_sighting {
            Some((seen, last)) if tick > seen && tick - seen <= 3 => {
                (target - last) / (tick - seen) as f64
            }
            _ => vec2(0.0, 0.0),
        };
        self.last_sighting = Some((tick, target));
        let flight_time = (target - position).length() / ROCKET_SPEED;
        action.shoot(angle_between(position, target + velocity * flight_time));
    }
}

fn move_towards(point: Vec2, position: Vec2, velocity: Vec2, action: &mut PilotAction) {
    let desired = clip(point - position, SPEED);
    action.accelerate(clip(desired - velocity, SPEED));
}

impl SpaceshipPilot for Batman {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        if !self.scanning {
            return Ok(None);
        }
        Ok(Some(self.next_scan()?))
    }

    fn update(&mut self, tick: u32, location: &Location, _: f64, _: f64, located: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        let position = location.position();
        let velocity = location.velocity();

        if tick == 0 {
            self.decide_corner(position, &mut action);
            return Ok(action);
        }
        if tick == STEERING_TICKS {
            self.steering_to_corner = false;
            self.scanning = true;
        }

        if self.steering_to_corner {
            self.steer_to_corner(position, velocity, &mut action);
        } else {
            self.stay_in_corner(position, velocity, &mut action);
        }

        if let Some(&target) = located.first() {
            self.fire_at(tick, position, target, &mut action);
        }
        Ok(action)
    }
}
