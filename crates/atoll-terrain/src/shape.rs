//! Island silhouette masks applied on top of the fractal height sum.

use crate::math::{det_cos, det_pow, det_sqrt};

/// A scalar mask over the generation domain, sampled in domain-local world
/// units (origin at the domain corner).
pub trait Shape: Send + Sync {
    /// Mask value at `(x, y)`, typically in `[0, 1]`.
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Cosine cone: `1` at the domain center, smoothly falling to `0` at half the
/// shorter extent and staying `0` beyond it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConeShape {
    width: f64,
    height: f64,
    power: f64,
}

impl ConeShape {
    /// Create a cone over a `width × height` domain with falloff exponent `power`.
    pub fn new(width: f64, height: f64, power: f64) -> Self {
        Self {
            width,
            height,
            power,
        }
    }
}

impl Shape for ConeShape {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.width * 0.5;
        let dy = y - self.height * 0.5;
        let extent = self.width.min(self.height);
        let distance = det_sqrt(dx * dx + dy * dy);
        let t = det_pow((2.0 * distance / extent).min(1.0), self.power);
        det_cos(std::f64::consts::PI * t) * 0.5 + 0.5
    }
}

/// Constant mask of `1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatShape;

impl Shape for FlatShape {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_cone_is_one_at_center() {
        let cone = ConeShape::new(25.0, 25.0, 2.0);
        assert!((cone.sample(12.5, 12.5) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cone_is_zero_at_corners_and_edges() {
        let cone = ConeShape::new(25.0, 25.0, 2.0);
        for (x, y) in [(0.0, 0.0), (25.0, 0.0), (0.0, 25.0), (25.0, 25.0), (0.0, 12.5)] {
            let v = cone.sample(x, y);
            assert!(v.abs() < EPSILON, "expected 0 at ({x}, {y}), got {v}");
        }
    }

    #[test]
    fn test_cone_decreases_outward() {
        let cone = ConeShape::new(20.0, 20.0, 1.5);
        let mut previous = cone.sample(10.0, 10.0);
        for i in 1..=20 {
            let v = cone.sample(10.0 + i as f64 * 0.5, 10.0);
            assert!(v <= previous + EPSILON, "mask rose at step {i}");
            previous = v;
        }
    }

    #[test]
    fn test_flat_shape_is_constant() {
        assert_eq!(FlatShape.sample(-3.0, 99.0), 1.0);
    }
}
