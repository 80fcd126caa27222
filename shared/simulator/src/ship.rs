use crate::config::Config;
use crate::physics::BodyTag;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u64);

/// Domain state of a spaceship. Its physics body is owned by the physics
/// collaborator and addressed through [`Spaceship::tag`].
#[derive(Clone, Debug)]
pub struct Spaceship {
    pub id: ShipId,
    pub name: String,
    pub color: Vector4<f32>,
    /// Message of the pilot fault from the latest tick. Cleared when the
    /// ship's next scan phase starts.
    pub fault: Option<String>,
    health: f64,
    max_health: f64,
    energy: f64,
    max_energy: f64,
    destroyed: bool,
}

impl Spaceship {
    pub fn new(id: ShipId, name: &str, color: Vector4<f32>, config: &Config) -> Spaceship {
        Spaceship {
            id,
            name: name.to_string(),
            color,
            fault: None,
            health: config.max_health,
            max_health: config.max_health,
            energy: config.max_energy,
            max_energy: config.max_energy,
            destroyed: false,
        }
    }

    pub fn tag(&self) -> BodyTag {
        BodyTag::Ship(self.id)
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Reduces health, never below zero. Returns true only on the call that
    /// destroys the ship.
    pub fn damage(&mut self, amount: f64) -> bool {
        if self.destroyed || !(amount > 0.0) {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health == 0.0 {
            self.destroyed = true;
            return true;
        }
        false
    }

    /// Deducts `cost` if the ship can afford it. Returns whether it did.
    pub fn use_energy(&mut self, cost: f64) -> bool {
        if !(cost.is_finite() && cost >= 0.0) || cost > self.energy {
            return false;
        }
        self.energy -= cost;
        true
    }

    pub fn add_energy(&mut self, amount: f64) {
        if amount.is_finite() {
            self.energy = (self.energy + amount).clamp(0.0, self.max_energy);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color;

    fn ship() -> Spaceship {
        Spaceship::new(ShipId(1), "test", color::from_u24(0xffffff), &Config::default())
    }

    #[test]
    fn test_damage_destroys_once() {
        let mut ship = ship();
        assert!(!ship.damage(85.0));
        assert_eq!(ship.health(), 15.0);
        assert!(ship.damage(20.0));
        assert_eq!(ship.health(), 0.0);
        assert!(ship.is_destroyed());
        assert!(!ship.damage(20.0));
        assert_eq!(ship.health(), 0.0);
    }

    #[test]
    fn test_damage_ignores_non_positive() {
        let mut ship = ship();
        assert!(!ship.damage(-10.0));
        assert!(!ship.damage(f64::NAN));
        assert_eq!(ship.health(), ship.max_health());
    }

    #[test]
    fn test_energy() {
        let mut ship = ship();
        assert!(ship.use_energy(30.0));
        assert_eq!(ship.energy(), 70.0);
        assert!(!ship.use_energy(70.5));
        assert_eq!(ship.energy(), 70.0);
        assert!(!ship.use_energy(f64::NAN));
        assert!(!ship.use_energy(-1.0));
        assert!(ship.use_energy(70.0));
        assert_eq!(ship.energy(), 0.0);
        ship.add_energy(10.0);
        assert_eq!(ship.energy(), 10.0);
        ship.add_energy(1000.0);
        assert_eq!(ship.energy(), ship.max_energy());
    }
}
