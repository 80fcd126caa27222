use crate::effect::Effect;
use crate::rocket::{Rocket, RocketId};
use crate::ship::{ShipId, Spaceship};
use std::collections::BTreeMap;

/// Id-indexed storage for everything in the round. Physics bodies are looked
/// up by tag, so domain objects never point at them.
#[derive(Default, Debug)]
pub struct Registry {
    pub ships: BTreeMap<ShipId, Spaceship>,
    pub rockets: BTreeMap<RocketId, Rocket>,
    pub effects: Vec<Effect>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Registry {
        Default::default()
    }

    pub fn next_ship_id(&mut self) -> ShipId {
        ShipId(self.allocate_id())
    }

    pub fn next_rocket_id(&mut self) -> RocketId {
        RocketId(self.allocate_id())
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ages every effect by `dt` seconds and drops the finished ones.
    pub fn prune_effects(&mut self, dt: f64) {
        for effect in self.effects.iter_mut() {
            effect.advance(dt);
        }
        self.effects.retain(|effect| !effect.is_over());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::effect::EffectKind;
    use nalgebra::vector;

    #[test]
    fn test_ids_are_unique() {
        let mut registry = Registry::new();
        let a = registry.next_ship_id();
        let b = registry.next_rocket_id();
        let c = registry.next_ship_id();
        assert_ne!(a.0, b.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_prune_effects() {
        let mut registry = Registry::new();
        let white = vector![1.0, 1.0, 1.0, 1.0];
        registry.effects.push(Effect::new(
            EffectKind::Explosion,
            vector![0.0, 0.0],
            2.0,
            white,
            0.5,
        ));
        registry.effects.push(Effect::new(
            EffectKind::Explosion,
            vector![0.0, 0.0],
            10.0,
            white,
            1.0,
        ));
        registry.prune_effects(0.2);
        assert_eq!(registry.effects.len(), 2);
        approx::assert_abs_diff_eq!(registry.effects[0].progress(), 0.4, epsilon = 1e-9);
        registry.prune_effects(0.4);
        assert_eq!(registry.effects.len(), 1);
        registry.prune_effects(0.5);
        assert!(registry.effects.is_empty());
    }
}
