use crate::PilotContext;
use spacejam_api::prelude::*;

const SPEED: f64 = 3.0;
const RADIUS: f64 = 20.0;

pub fn create(context: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Orbiter::new(context))
}

/// Circles the field center on a tighter orbit than `circle`, matching the
/// velocity it wants instead of steering at a point.
pub struct Orbiter {
    center: Vec2,
    start_angle: f64,
}

impl Orbiter {
    pub fn new(context: &PilotContext) -> Orbiter {
        Orbiter {
            center: vec2(context.field_size / 2.0, context.field_size / 2.0),
            start_angle: 0.0,
        }
    }
}

impl SpaceshipPilot for Orbiter {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, tick: u32, location: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        let position = location.position();
        if tick == 0 {
            self.start_angle = angle_between(self.center, position);
        }

        let angle = self.start_angle + tick as f64 * SPEED / RADIUS;
        let target = self.center + vec_from_angle(angle) * RADIUS;
        let desired = clip(target - position, SPEED);
        action.accelerate(desired - location.velocity());

        if tick % 10 == 0 {
            action.shoot(angle_between(position, self.center) - PI / 2.0);
        }
        Ok(action)
    }
}
