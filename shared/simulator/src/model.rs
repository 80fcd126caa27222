use nalgebra::{vector, Vector2};

const HULL: [[f64; 2]; 4] = [[2.618, 0.0], [0.0, -1.0], [-1.0, 0.0], [0.0, 1.0]];
const HULL_LENGTH: f64 = 3.618;

pub fn scale(scale: f64, vertices: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    vertices
        .iter()
        .map(|&v| vector![scale * v.x, scale * v.y])
        .collect::<Vec<_>>()
}

/// Diamond hull pointing along +x, `size` long from tail to nose.
pub fn spaceship(size: f64) -> Vec<Vector2<f64>> {
    let vertices: Vec<_> = HULL.iter().map(|&[x, y]| vector![x, y]).collect();
    scale(size / HULL_LENGTH, &vertices)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_spaceship_length() {
        let hull = spaceship(5.0);
        let min_x = hull.iter().map(|v| v.x).fold(f64::INFINITY, f64::min);
        let max_x = hull.iter().map(|v| v.x).fold(f64::NEG_INFINITY, f64::max);
        approx::assert_abs_diff_eq!(max_x - min_x, 5.0, epsilon = 1e-9);
    }
}
