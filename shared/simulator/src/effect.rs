use nalgebra::{Vector2, Vector4};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    ScanFlash { direction: f64, angle: f64 },
    Explosion,
}

/// A short-lived visual marker. Has no influence on the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vector2<f64>,
    pub radius: f64,
    pub color: Vector4<f32>,
    pub duration: f64,
    age: f64,
}

impl Effect {
    pub fn new(
        kind: EffectKind,
        position: Vector2<f64>,
        radius: f64,
        color: Vector4<f32>,
        duration: f64,
    ) -> Effect {
        Effect {
            kind,
            position,
            radius,
            color,
            duration,
            age: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.age += dt;
    }

    pub fn is_over(&self) -> bool {
        self.age >= self.duration
    }

    /// Fraction of the lifetime elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.age / self.duration).min(1.0)
        }
    }
}
