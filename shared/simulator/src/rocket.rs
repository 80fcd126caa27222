use crate::physics::BodyTag;
use crate::ship::ShipId;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RocketId(pub u64);

#[derive(Clone, Debug)]
pub struct Rocket {
    pub id: RocketId,
    /// Ship that fired the rocket. Its hull and its other rockets are not hit.
    pub shooter: ShipId,
    pub color: Vector4<f32>,
}

impl Rocket {
    pub fn tag(&self) -> BodyTag {
        BodyTag::Rocket(self.id)
    }
}
