use crate::PilotContext;
use spacejam_api::prelude::*;

pub fn create(_: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Idle)
}

/// Never scans and never acts.
pub struct Idle;

impl SpaceshipPilot for Idle {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, _: u32, _: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        Ok(PilotAction::new())
    }
}
