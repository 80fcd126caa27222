use std::f64::consts::{PI, TAU};

/// A two-dimensional vector.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Returns a [Vec2] with the given coordinates.
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Extra methods for Vec2.
pub trait Vec2Extras {
    /// Returns the length (or distance from origin).
    fn length(self) -> f64;

    /// Returns the distance to `other`.
    fn distance(self, other: Vec2) -> f64;

    /// Returns the angle of the vector (in radians, within `(-π, π]`).
    fn heading(self) -> f64;

    /// Returns this vector rotated by the given angle (in radians).
    fn rotate(self, angle: f64) -> Vec2;
}

impl Vec2Extras for Vec2 {
    fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    fn heading(self) -> f64 {
        wrap_to_pi(self.y.atan2(self.x))
    }

    fn rotate(self, angle: f64) -> Vec2 {
        let cos = angle.cos();
        let sin = angle.sin();
        vec2(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Returns a unit vector pointing in direction `angle` (radians).
pub fn vec_from_angle(angle: f64) -> Vec2 {
    vec2(angle.cos(), angle.sin())
}

/// Scales `v` down so its length is at most `max`.
pub fn clip(v: Vec2, max: f64) -> Vec2 {
    let length = v.length();
    if length > max && length > 0.0 {
        v * (max / length)
    } else {
        v
    }
}

/// Returns the direction (radians) from `from` towards `to`.
pub fn angle_between(from: Vec2, to: Vec2) -> f64 {
    (to - from).heading()
}

/// Maps an angle into `(-π, π]`.
///
/// Angles already in range are returned unchanged.
pub fn wrap_to_pi(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Returns the signed shortest rotation from angle `a` to angle `b`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_to_pi(b - a)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_to_pi() {
        assert_eq!(wrap_to_pi(0.0), 0.0);
        assert_eq!(wrap_to_pi(PI), PI);
        assert_eq!(wrap_to_pi(-PI), PI);
        assert_abs_diff_eq!(wrap_to_pi(TAU), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_to_pi(3.0 * PI), PI, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_to_pi(-PI / 2.0 - TAU), -PI / 2.0, epsilon = 1e-9);
        for i in -100..100 {
            let angle = i as f64 * 0.37;
            let wrapped = wrap_to_pi(angle);
            assert!(wrapped > -PI && wrapped <= PI, "{angle} -> {wrapped}");
            assert_eq!(wrap_to_pi(wrapped), wrapped);
        }
        for angle in [
            1e6 * TAU + 0.3,
            -1e6 * TAU - 0.3,
            1e9 * TAU,
            -1e9 * TAU,
            1e15,
            -1e15,
            f64::MAX / 2.0,
            -f64::MAX / 2.0,
            f64::MAX,
        ] {
            let wrapped = wrap_to_pi(angle);
            assert!(wrapped > -PI && wrapped <= PI, "{angle} -> {wrapped}");
            assert_eq!(wrap_to_pi(wrapped), wrapped);
        }
        assert_abs_diff_eq!(wrap_to_pi(1e6 * TAU + 0.3), 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff() {
        assert_abs_diff_eq!(angle_diff(0.1, -0.1), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip(vec2(3.0, 4.0), 10.0), vec2(3.0, 4.0));
        let clipped = clip(vec2(3.0, 4.0), 1.0);
        assert_abs_diff_eq!(clipped.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(clipped.x, 0.6, epsilon = 1e-12);
        assert_eq!(clip(vec2(0.0, 0.0), 0.0), vec2(0.0, 0.0));
    }

    #[test]
    fn test_heading_and_rotate() {
        assert_abs_diff_eq!(vec2(0.0, 1.0).heading(), PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_between(vec2(1.0, 1.0), vec2(0.0, 1.0)), PI, epsilon = 1e-12);
        let v = vec2(1.0, 0.0).rotate(PI / 2.0);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vec2(1.0, 0.0).distance(vec2(4.0, 4.0)), 5.0, epsilon = 1e-12);
    }
}
