use crate::PilotContext;
use spacejam_api::prelude::*;

const SPEED: f64 = 3.0;
const RADIUS: f64 = 30.0;

pub fn create(context: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Circle::new(context))
}

/// Flies a circle around the field center, firing tangentially.
pub struct Circle {
    center: Vec2,
    start_angle: f64,
}

impl Circle {
    pub fn new(context: &PilotContext) -> Circle {
        Circle {
            center: vec2(context.field_size / 2.0, context.field_size / 2.0),
            start_angle: 0.0,
        }
    }
}

impl SpaceshipPilot for Circle {
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
        action.accelerate(clip(target - (position + location.velocity()), SPEED));

        if tick % 5 == 0 {
            action.shoot(angle_between(position, self.center) - PI / 2.0);
        }
        Ok(action)
    }
}
