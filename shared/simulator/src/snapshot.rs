use crate::effect::EffectKind;
use crate::rocket::RocketId;
use crate::ship::ShipId;
use crate::simulation::Status;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Everything a renderer needs to draw one frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Snapshot {
    pub tick: u32,
    pub time: f64,
    pub status: Status,
    pub field_size: f64,
    pub ships: Vec<ShipSnapshot>,
    pub rockets: Vec<RocketSnapshot>,
    pub effects: Vec<EffectSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShipSnapshot {
    pub id: ShipId,
    pub name: String,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub heading: f64,
    /// Hull outline relative to `position` before rotation by `heading`.
    pub hull: Vec<Vector2<f64>>,
    pub color: u32,
    pub health: f64,
    pub energy: f64,
    pub fault: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RocketSnapshot {
    pub id: RocketId,
    pub shooter: ShipId,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub radius: f64,
    pub color: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EffectSnapshot {
    pub kind: EffectKind,
    pub position: Point2<f64>,
    pub radius: f64,
    pub color: u32,
    pub duration: f64,
    pub progress: f64,
}
