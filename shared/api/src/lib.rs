#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
mod vec;

pub use vec::*;

use std::f64::consts::TAU;
use std::fmt;

/// Result type returned by pilot callbacks.
///
/// Any error is reported by the simulator as a pilot fault and the ship
/// skips the rest of that phase.
pub type PilotResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Position and velocity of a spaceship at the start of a tick.
///
/// The velocity is measured in field units per tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    position: Vec2,
    velocity: Vec2,
}

impl Location {
    /// Creates a location snapshot.
    pub fn new(position: Vec2, velocity: Vec2) -> Location {
        Location { position, velocity }
    }

    /// Returns the position in field coordinates.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns the average velocity per tick.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Error returned when a [`ScanRequest`] is constructed with invalid parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanValidationError {
    /// The sector width was outside of `[0, 2π]`.
    Angle(f64),
    /// The scan radius was negative or not finite.
    Distance(f64),
    /// The scan direction was not finite.
    Direction(f64),
}

impl fmt::Display for ScanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanValidationError::Angle(angle) => {
                write!(f, "scan angle {angle} is outside of [0, 2*pi]")
            }
            ScanValidationError::Distance(distance) => {
                write!(f, "scan distance {distance} must be a non-negative number")
            }
            ScanValidationError::Direction(direction) => {
                write!(f, "scan direction {direction} is not a finite angle")
            }
        }
    }
}

impl std::error::Error for ScanValidationError {}

/// A request to scan a circular sector around the spaceship.
///
/// Costs `distance² × angle / 2` times the configured scan cost factor in
/// energy. A request that costs more than the ship's energy is ignored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanRequest {
    direction: f64,
    distance: f64,
    angle: f64,
}

impl ScanRequest {
    /// Creates a scan request.
    ///
    /// `direction` is the center of the sector in radians and is normalized
    /// to `(-π, π]`. `distance` is the sector radius and `angle` its full
    /// width, which must lie within `[0, 2π]`.
    pub fn new(direction: f64, distance: f64, angle: f64) -> Result<ScanRequest, ScanValidationError> {
        if !direction.is_finite() {
            return Err(ScanValidationError::Direction(direction));
        }
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(ScanValidationError::Distance(distance));
        }
        if !(0.0..=TAU).contains(&angle) {
            return Err(ScanValidationError::Angle(angle));
        }
        Ok(ScanRequest {
            direction: wrap_to_pi(direction),
            distance,
            angle,
        })
    }

    /// Returns the normalized direction of the sector center.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Returns the sector radius.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Returns the full sector width in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// The actions a pilot wants to perform this tick.
///
/// Acceleration and shooting are paid for separately, so one can succeed
/// while the other is dropped for lack of energy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PilotAction {
    /// Requested change of velocity in field units per tick.
    pub acceleration: Option<Vec2>,
    /// Direction in radians to fire a rocket in.
    pub shoot_angle: Option<f64>,
}

impl PilotAction {
    /// Returns an action that does nothing.
    pub fn new() -> PilotAction {
        PilotAction::default()
    }

    /// Changes the velocity by `acceleration` (clamped by the simulator).
    pub fn accelerate(&mut self, acceleration: Vec2) -> &mut Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Accelerates towards `direction` (radians) with the given `power`.
    pub fn move_spaceship(&mut self, direction: f64, power: f64) -> &mut Self {
        self.accelerate(vec_from_angle(direction) * power)
    }

    /// Fires a rocket in direction `angle` (radians).
    pub fn shoot(&mut self, angle: f64) -> &mut Self {
        self.shoot_angle = Some(angle);
        self
    }

    /// Returns true if neither acceleration nor shooting was requested.
    pub fn is_empty(&self) -> bool {
        self.acceleration.is_none() && self.shoot_angle.is_none()
    }
}

/// The interface implemented by every spaceship pilot.
///
/// Both methods receive read-only snapshots of the ship and return plain
/// data; pilots never get a handle into the simulation. Each call runs on the
/// pilot's own worker thread with a wall-clock budget, so a pilot that takes
/// too long simply loses its turn.
pub trait SpaceshipPilot: Send {
    /// Called first each tick. Return a [`ScanRequest`] to look for other
    /// ships, or `None` to skip scanning.
    fn prepare_scan(
        &mut self,
        tick: u32,
        location: &Location,
        health: f64,
        energy: f64,
    ) -> PilotResult<Option<ScanRequest>>;

    /// Called after [`SpaceshipPilot::prepare_scan`]. `located` holds the
    /// positions of the ships found by this tick's scan, in random order,
    /// and is empty if no scan ran.
    fn update(
        &mut self,
        tick: u32,
        location: &Location,
        health: f64,
        energy: f64,
        located: &[Vec2],
    ) -> PilotResult<PilotAction>;
}

/// Commonly used items for writing pilots.
pub mod prelude {
    pub use super::vec::*;
    pub use super::{
        Location, PilotAction, PilotResult, ScanRequest, ScanValidationError, SpaceshipPilot,
    };
    pub use std::f64::consts::{PI, TAU};
}
