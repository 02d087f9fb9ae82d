//! Wave-cut shoreline erosion.

use rand::Rng;

use crate::grid::ElevationGrid;
use crate::math::det_pow;
use crate::noise_field::NoiseField;
use crate::params::CoastalParams;

/// Compresses low-lying cells toward zero below a noisy wave height,
/// carving an irregular shoreline instead of a flat waterline cut.
pub struct CoastalErosion<'a> {
    params: &'a CoastalParams,
}

impl<'a> CoastalErosion<'a> {
    /// Bind the pass to its parameters.
    pub fn new(params: &'a CoastalParams) -> Self {
        Self { params }
    }

    /// Local wave height for a noise value in `[0, 1]`.
    pub fn threshold(&self, noise: f64) -> f64 {
        self.params.wave_height_min
            + noise * (self.params.wave_height_max - self.params.wave_height_min)
    }

    /// Compress `height` against `threshold`: `h * (|h| / threshold)^power`.
    ///
    /// Uses the magnitude so negative heights shrink toward zero as well.
    pub fn compress(&self, height: f64, threshold: f64) -> f64 {
        if height < threshold {
            height * det_pow(height.abs() / threshold, self.params.power)
        } else {
            height
        }
    }

    /// Apply the pass to `grid`.
    pub fn apply<R: Rng + ?Sized>(&self, grid: &mut ElevationGrid, rng: &mut R) {
        let resolution = grid.resolution();
        let (extent_x, extent_y) = grid.extent();
        let scale = self.params.noise_scale;
        let noise = NoiseField::new(
            (extent_x * scale).ceil() as usize,
            (extent_y * scale).ceil() as usize,
            rng,
        );

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let n = noise.sample(
                    x as f64 * resolution * scale,
                    y as f64 * resolution * scale,
                );
                let threshold = self.threshold(n);
                let compressed = self.compress(grid.get(x, y), threshold);
                grid.set(x, y, compressed);
            }
        }
    }
}
