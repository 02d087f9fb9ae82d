//! Multi-octave fractal height map shaped into an island silhouette.
//!
//! Each octave is its own [`NoiseField`]; octave `k` samples a lattice
//! `scale_falloff^k` times denser than the first, weighted by an influence
//! that decays geometrically so all influences sum to one.

use rand::Rng;

use crate::error::TerrainError;
use crate::grid::ElevationGrid;
use crate::math::det_pow;
use crate::noise_field::NoiseField;
use crate::params::HeightMapParams;
use crate::shape::Shape;

/// Per-octave influence weights `i0 * falloff^k` with `i0` chosen so they sum to 1.
pub fn octave_influences(octaves: u32, falloff: f64) -> Vec<f64> {
    if octaves == 0 {
        return Vec::new();
    }
    let n = octaves as i32;
    let first = if (1.0 - falloff).abs() < 1e-12 {
        1.0 / octaves as f64
    } else {
        (1.0 - falloff) / (1.0 - falloff.powi(n))
    };
    (0..n).map(|k| first * falloff.powi(k)).collect()
}

/// Output of the synthesizer: the grid plus its highest sample, which the
/// volcano pass uses to place crater rims.
#[derive(Clone, Debug)]
pub struct HeightMap {
    /// Synthesized elevations.
    pub grid: ElevationGrid,
    /// Highest synthesized elevation.
    pub max_height: f64,
}

/// Builds elevation grids from layered noise.
pub struct HeightMapSynthesizer {
    params: HeightMapParams,
}

impl HeightMapSynthesizer {
    /// Create a synthesizer for the given octave configuration.
    pub fn new(params: HeightMapParams) -> Self {
        Self { params }
    }

    /// Synthesize a grid covering `world_width × world_height`.
    ///
    /// The normalized fractal sum is clamped to `>= 0` before `height_power`
    /// is applied, then multiplied by `amplitude` and by `shape`, which is
    /// sampled in domain-local world units.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError`] if the domain or resolution is degenerate.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        world_width: f64,
        world_height: f64,
        resolution: f64,
        shape: &dyn Shape,
        rng: &mut R,
    ) -> Result<HeightMap, TerrainError> {
        if self.params.octaves == 0 {
            return Err(TerrainError::InvalidOctaves(0));
        }
        let mut grid = ElevationGrid::new(world_width, world_height, resolution)?;
        let (extent_x, extent_y) = grid.extent();

        let scales: Vec<f64> = (0..self.params.octaves as i32)
            .map(|k| self.params.scale * self.params.scale_falloff.powi(k))
            .collect();
        let fields: Vec<NoiseField> = scales
            .iter()
            .map(|&scale| {
                NoiseField::new(
                    (scale * extent_x).ceil() as usize,
                    (scale * extent_y).ceil() as usize,
                    rng,
                )
            })
            .collect();
        let influences = octave_influences(self.params.octaves, self.params.influence_falloff);

        let mut max_height = f64::NEG_INFINITY;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let wx = x as f64 * resolution;
                let wy = y as f64 * resolution;

                let mut height01 = 0.0;
                for ((field, &scale), &influence) in fields.iter().zip(&scales).zip(&influences) {
                    height01 += field.sample(wx * scale, wy * scale) * influence;
                }

                let value = det_pow(height01.max(0.0), self.params.height_power)
                    * self.params.amplitude
                    * shape.sample(wx, wy);
                max_height = max_height.max(value);
                grid.set(x, y, value);
            }
        }

        Ok(HeightMap { grid, max_height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lcg;
    use crate::shape::{ConeShape, FlatShape};

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_influences_sum_to_one() {
        for octaves in 1..=12 {
            for falloff in [0.05, 0.3, 0.5, 0.75, 0.99, 1.0, 1.5] {
                let sum: f64 = octave_influences(octaves, falloff).iter().sum();
                assert!(
                    (sum - 1.0).abs() < 1e-9,
                    "octaves={octaves} falloff={falloff} sums to {sum}"
                );
            }
        }
    }

    #[test]
    fn test_influences_decay_geometrically() {
        let weights = octave_influences(4, 0.5);
        for pair in weights.windows(2) {
            assert!((pair[1] / pair[0] - 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn test_grid_dimensions_and_max_height() {
        let synth = HeightMapSynthesizer::new(HeightMapParams::default());
        let map = synth
            .generate(5.0, 4.0, 0.1, &FlatShape, &mut Lcg::new(3))
            .unwrap();
        assert_eq!((map.grid.width(), map.grid.height()), (51, 41));
        assert_eq!(map.grid.max_value(), Some(map.max_height));
    }

    #[test]
    fn test_same_seed_same_grid() {
        let synth = HeightMapSynthesizer::new(HeightMapParams::default());
        let shape = ConeShape::new(6.0, 6.0, 2.0);
        let a = synth.generate(6.0, 6.0, 0.2, &shape, &mut Lcg::new(11)).unwrap();
        let b = synth.generate(6.0, 6.0, 0.2, &shape, &mut Lcg::new(11)).unwrap();
        assert_eq!(a.grid, b.grid);
    }

    #[test]
    fn test_different_seeds_differ() {
        let synth = HeightMapSynthesizer::new(HeightMapParams::default());
        let a = synth.generate(6.0, 6.0, 0.2, &FlatShape, &mut Lcg::new(1)).unwrap();
        let b = synth.generate(6.0, 6.0, 0.2, &FlatShape, &mut Lcg::new(2)).unwrap();
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_cone_mask_zeroes_the_border() {
        let synth = HeightMapSynthesizer::new(HeightMapParams::default());
        let shape = ConeShape::new(8.0, 8.0, 2.0);
        let map = synth.generate(8.0, 8.0, 0.25, &shape, &mut Lcg::new(9)).unwrap();
        let last = map.grid.width() - 1;
        for i in 0..map.grid.width() {
            for (x, y) in [(i, 0), (0, i), (i, last), (last, i)] {
                assert!(map.grid.get(x, y).abs() < EPSILON, "border ({x}, {y}) not zero");
            }
        }
        assert!(map.max_height > 0.0);
    }

    #[test]
    fn test_heights_are_finite_and_non_negative() {
        let params = HeightMapParams {
            height_power: 0.7,
            ..Default::default()
        };
        let map = HeightMapSynthesizer::new(params)
            .generate(4.0, 4.0, 0.1, &FlatShape, &mut Lcg::new(77))
            .unwrap();
        assert!(map.grid.values().iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_amplitude_bounds_heights() {
        let params = HeightMapParams {
            amplitude: 2.0,
            height_power: 1.0,
            ..Default::default()
        };
        let map = HeightMapSynthesizer::new(params)
            .generate(4.0, 4.0, 0.1, &FlatShape, &mut Lcg::new(5))
            .unwrap();
        // Compressed noise tops out below 0.9, so heights stay under 0.9 * amplitude.
        assert!(map.max_height < 1.8, "max height {}", map.max_height);
    }
}
