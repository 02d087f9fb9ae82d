//! Seeded value-noise lattice sampled with bicubic interpolation.

use rand::Rng;

use crate::math::cubic;

/// Scale applied to the raw interpolated value by [`NoiseField::sample`].
pub const COMPRESS_SCALE: f64 = 0.5;
/// Offset added after scaling by [`NoiseField::sample`].
pub const COMPRESS_OFFSET: f64 = 0.25;

/// An immutable lattice of uniform random values in `[0, 1)`.
///
/// A field declared as `width × height` stores `(width + 3) × (height + 3)`
/// values so the four-sample cubic footprint around any query in
/// `[0, width] × [0, height]` stays inside the lattice.
#[derive(Clone, Debug)]
pub struct NoiseField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseField {
    /// Fill a new field from `rng`. Zero-sized dimensions are bumped to 1.
    pub fn new<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let count = (width + 3) * (height + 3);
        let values = (0..count).map(|_| rng.random::<f64>()).collect();
        Self {
            width,
            height,
            values,
        }
    }

    /// Declared width (queries are valid up to and including this value).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Declared height.
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * (self.width + 3) + x]
    }

    /// Sample the field at a fractional coordinate.
    ///
    /// The result is compressed into roughly `[0.25, 0.75]`
    /// (`v * COMPRESS_SCALE + COMPRESS_OFFSET`)
    /// to soften extremes. Queries outside `[0, width] × [0, height]` are a
    /// caller error.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        debug_assert!(
            x >= 0.0 && y >= 0.0 && x <= self.width as f64 && y <= self.height as f64,
            "noise query ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );

        let xi = (x.floor().max(0.0) as usize).min(self.width - 1);
        let yi = (y.floor().max(0.0) as usize).min(self.height - 1);
        let fx = x - xi as f64;
        let fy = y - yi as f64;

        let row = |j: usize| {
            cubic(
                self.value(xi, yi + j),
                self.value(xi + 1, yi + j),
                self.value(xi + 2, yi + j),
                self.value(xi + 3, yi + j),
                fx,
            )
        };

        cubic(row(0), row(1), row(2), row(3), fy) * COMPRESS_SCALE + COMPRESS_OFFSET
    }

    /// Sample with the compression undone and the lattice range mapped to
    /// `[-1, 1]`. Cubic overshoot past the lattice values is clamped.
    pub fn sample_signed(&self, x: f64, y: f64) -> f64 {
        let raw = (self.sample(x, y) - COMPRESS_OFFSET) / COMPRESS_SCALE;
        (raw * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lcg;

    #[test]
    fn test_lattice_is_padded() {
        let mut rng = Lcg::new(1);
        let field = NoiseField::new(4, 6, &mut rng);
        assert_eq!(field.values.len(), 7 * 9);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = NoiseField::new(8, 8, &mut Lcg::new(99));
        let b = NoiseField::new(8, 8, &mut Lcg::new(99));
        for i in 0..80 {
            let x = i as f64 * 0.1;
            let y = 8.0 - i as f64 * 0.1;
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_samples_interpolate_lattice_points() {
        let field = NoiseField::new(5, 5, &mut Lcg::new(12));
        let expected = field.value(2, 3) * 0.5 + 0.25;
        assert!((field.sample(1.0, 2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_output_stays_near_center_band() {
        let field = NoiseField::new(16, 16, &mut Lcg::new(5));
        for i in 0..=160 {
            for j in 0..=16 {
                let v = field.sample(i as f64 * 0.1, j as f64);
                // Bicubic Catmull-Rom overshoot stays within 0.29 per side.
                assert!((0.1..=0.9).contains(&v), "sample {v} out of band");
            }
        }
    }

    #[test]
    fn test_signed_samples_span_full_range() {
        let field = NoiseField::new(40, 40, &mut Lcg::new(17));
        let (mut lo, mut hi) = (f64::MAX, f64::MIN);
        for y in 0..=40 {
            for x in 0..=40 {
                let v = field.sample_signed(x as f64, y as f64);
                assert!((-1.0..=1.0).contains(&v), "signed sample {v} out of range");
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        assert!(lo <= -0.9 && hi >= 0.9, "signed range [{lo}, {hi}]");
    }

    #[test]
    fn test_upper_edge_is_queryable() {
        let field = NoiseField::new(3, 3, &mut Lcg::new(8));
        let v = field.sample(3.0, 3.0);
        assert!(v.is_finite());
    }

    #[test]
    fn test_field_is_continuous() {
        let field = NoiseField::new(10, 10, &mut Lcg::new(21));
        let step = 0.001;
        for i in 0..9000 {
            let x = i as f64 * step;
            let delta = (field.sample(x + step, 4.5) - field.sample(x, 4.5)).abs();
            assert!(delta < 0.01, "jump of {delta} at x={x}");
        }
    }
}
