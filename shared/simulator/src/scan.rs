//! Sector scan geometry.
//!
//! A scan covers the circular sector around a ship's position that is
//! `distance` long and `angle` wide, centered on `direction`.
use spacejam_api::{angle_diff, ScanRequest, Vec2, Vec2Extras};

/// Angular tolerance for points on the sector's edge.
pub const EPSILON: f64 = 1e-4;

pub fn scanned_area(distance: f64, angle: f64) -> f64 {
    distance * distance * angle / 2.0
}

pub fn scan_cost(request: &ScanRequest, cost_factor: f64) -> f64 {
    scanned_area(request.distance(), request.angle()) * cost_factor
}

/// Returns true if `target` lies within the sector. Both edges are
/// inclusive; a target at the sector's apex is always inside.
pub fn is_in_scan(target: Vec2, center: Vec2, direction: f64, distance: f64, angle: f64) -> bool {
    let offset = target - center;
    let range = offset.length();
    if range > distance {
        return false;
    }
    if range == 0.0 {
        return true;
    }
    let bearing = offset.y.atan2(offset.x);
    angle_diff(direction, bearing).abs() - angle / 2.0 <= EPSILON
}

/// Returns the candidate positions covered by `request` scanned from
/// `center`, in candidate order. Callers shuffle before handing the result
/// to a pilot.
pub fn locate_targets(
    center: Vec2,
    request: &ScanRequest,
    candidates: impl IntoIterator<Item = Vec2>,
) -> Vec<Vec2> {
    candidates
        .into_iter()
        .filter(|&target| {
            is_in_scan(
                target,
                center,
                request.direction(),
                request.distance(),
                request.angle(),
            )
        })
        .collect()
}
