//! Turns physics contacts into damage and destruction.
//!
//! Nothing is removed while contacts are being resolved. Spent rockets and
//! destroyed ships go into a pending set and are removed together by
//! [`CollisionResolver::remove_bodies`] once the physics step is over.
use crate::config::Config;
use crate::effect::{Effect, EffectKind};
use crate::physics::{BodyTag, Contact, Physics};
use crate::registry::Registry;
use crate::rocket::RocketId;
use crate::ship::ShipId;
use std::collections::BTreeSet;

#[derive(Default, Debug)]
pub struct CollisionResolver {
    pending: BTreeSet<BodyTag>,
}

impl CollisionResolver {
    pub fn new() -> CollisionResolver {
        Default::default()
    }

    pub fn pending(&self) -> &BTreeSet<BodyTag> {
        &self.pending
    }

    pub fn is_pending(&self, tag: BodyTag) -> bool {
        self.pending.contains(&tag)
    }

    /// Resolves one begin-contact event. Each rocket in the pair is resolved
    /// against the other body.
    pub fn begin_contact(
        &mut self,
        registry: &mut Registry,
        physics: &dyn Physics,
        config: &Config,
        contact: Contact,
    ) {
        if let BodyTag::Rocket(rocket) = contact.a {
            self.resolve_rocket(registry, physics, config, rocket, contact.b);
        }
        if let BodyTag::Rocket(rocket) = contact.b {
            self.resolve_rocket(registry, physics, config, rocket, contact.a);
        }
    }

    fn resolve_rocket(
        &mut self,
        registry: &mut Registry,
        physics: &dyn Physics,
        config: &Config,
        rocket_id: RocketId,
        other: BodyTag,
    ) {
        let rocket_tag = BodyTag::Rocket(rocket_id);
        if self.is_pending(rocket_tag) {
            return;
        }
        let Some(shooter) = registry.rockets.get(&rocket_id).map(|r| r.shooter) else {
            return;
        };
        match other {
            BodyTag::Rocket(other_id) => {
                let same_shooter = registry
                    .rockets
                    .get(&other_id)
                    .map_or(false, |r| r.shooter == shooter);
                if !same_shooter {
                    self.pending.insert(rocket_tag);
                }
            }
            BodyTag::Ship(ship_id) if ship_id == shooter => {}
            BodyTag::Ship(ship_id) => self.hit(registry, physics, config, rocket_id, ship_id),
            BodyTag::Border => {
                self.pending.insert(rocket_tag);
            }
        }
    }

    fn hit(
        &mut self,
        registry: &mut Registry,
        physics: &dyn Physics,
        config: &Config,
        rocket_id: RocketId,
        ship_id: ShipId,
    ) {
        let rocket_tag = BodyTag::Rocket(rocket_id);
        self.pending.insert(rocket_tag);
        match registry.ships.get(&ship_id) {
            Some(ship) if !ship.is_destroyed() => {}
            _ => return,
        }
        if let Some(position) = physics
            .body_state(rocket_tag)
            .or_else(|| physics.body_state(BodyTag::Ship(ship_id)))
            .map(|state| state.position)
        {
            if let Some(rocket) = registry.rockets.get(&rocket_id) {
                registry.effects.push(Effect::new(
                    EffectKind::Explosion,
                    position,
                    config.impact_explosion_radius,
                    rocket.color,
                    config.explosion_duration,
                ));
            }
        }
        self.damage_ship(registry, physics, config, ship_id, config.rocket_damage);
    }

    /// Damages a ship and, if that destroys it, schedules its removal and
    /// adds a destruction explosion. Returns true if the ship was destroyed.
    pub fn damage_ship(
        &mut self,
        registry: &mut Registry,
        physics: &dyn Physics,
        config: &Config,
        ship_id: ShipId,
        amount: f64,
    ) -> bool {
        let Some(ship) = registry.ships.get_mut(&ship_id) else {
            return false;
        };
        if !ship.damage(amount) {
            return false;
        }
        log::info!("Ship {} ({:?}) destroyed", ship.name, ship_id);
        let tag = ship.tag();
        let color = ship.color;
        self.pending.insert(tag);
        if let Some(state) = physics.body_state(tag) {
            registry.effects.push(Effect::new(
                EffectKind::Explosion,
                state.position,
                config.destruction_explosion_radius,
                color,
                config.explosion_duration,
            ));
        }
        true
    }

    /// Destroys every pending body and drops its domain object. Returns the
    /// ids of the removed ships.
    pub fn remove_bodies(
        &mut self,
        registry: &mut Registry,
        physics: &mut dyn Physics,
    ) -> Vec<ShipId> {
        let mut removed = vec![];
        for tag in std::mem::take(&mut self.pending) {
            physics.destroy_body(tag);
            match tag {
                BodyTag::Ship(id) => {
                    registry.ships.remove(&id);
                    removed.push(id);
                }
                BodyTag::Rocket(id) => {
                    registry.rockets.remove(&id);
                }
                BodyTag::Border => {}
            }
        }
        removed
    }
}
