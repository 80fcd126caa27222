use crate::PilotContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spacejam_api::prelude::*;

pub fn create(context: &PilotContext) -> Box<dyn SpaceshipPilot> {
    Box::new(Afk::new(context))
}

/// Sits still and fires in one random direction every 10 ticks.
pub struct Afk {
    angle: f64,
}

impl Afk {
    pub fn new(context: &PilotContext) -> Afk {
        let mut rng = ChaCha8Rng::seed_from_u64(context.seed);
        Afk {
            angle: rng.gen_range(0.0..TAU),
        }
    }
}

impl SpaceshipPilot for Afk {
    fn prepare_scan(&mut self, _: u32, _: &Location, _: f64, _: f64) -> PilotResult<Option<ScanRequest>> {
        Ok(None)
    }

    fn update(&mut self, tick: u32, _: &Location, _: f64, _: f64, _: &[Vec2]) -> PilotResult<PilotAction> {
        let mut action = PilotAction::new();
        if tick % 10 == 0 {
            action.shoot(self.angle);
        }
        Ok(action)
    }
}
