//! Crater carving on the tallest terrain.

use rand::Rng;

use crate::grid::ElevationGrid;
use crate::noise_field::NoiseField;
use crate::params::VolcanoParams;

/// Carves crater bowls into everything above a noisy rim height.
pub struct Volcanoes<'a> {
    params: &'a VolcanoParams,
}

impl<'a> Volcanoes<'a> {
    /// Bind the pass to its parameters.
    pub fn new(params: &'a VolcanoParams) -> Self {
        Self { params }
    }

    /// Rim height for a terrain whose synthesized peak is `max_height`.
    ///
    /// Never lower than `max_height - max_depth / crater_scale`, so the
    /// deepest crater point stays within `max_depth` of the rim.
    pub fn rim_threshold(&self, max_height: f64) -> f64 {
        self.params
            .threshold
            .max(max_height - self.params.max_depth / self.params.crater_scale)
    }

    /// Apply the pass to `grid`. Heights only ever decrease.
    pub fn apply<R: Rng + ?Sized>(&self, grid: &mut ElevationGrid, max_height: f64, rng: &mut R) {
        let resolution = grid.resolution();
        let (extent_x, extent_y) = grid.extent();
        let scale = self.params.threshold_scale;
        let noise = NoiseField::new(
            (extent_x * scale).ceil() as usize,
            (extent_y * scale).ceil() as usize,
            rng,
        );
        let rim = self.rim_threshold(max_height);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let n = noise.sample_signed(
                    x as f64 * resolution * scale,
                    y as f64 * resolution * scale,
                );
                let threshold = rim + n * self.params.threshold_amplitude;
                let height = grid.get(x, y);
                if height > threshold {
                    grid.set(
                        x,
                        y,
                        height - (height - threshold) * (1.0 + self.params.crater_scale),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lcg;

    fn dome() -> (ElevationGrid, f64) {
        let size = 41;
        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 - 20.0;
                let dy = y as f64 - 20.0;
                values.push((3.0 - (dx * dx + dy * dy).sqrt() * 0.15).max(0.0));
            }
        }
        (ElevationGrid::from_values(size, size, 0.1, values).unwrap(), 3.0)
    }

    #[test]
    fn test_rim_adapts_to_peak() {
        let params = VolcanoParams {
            threshold: 1.0,
            max_depth: 0.4,
            crater_scale: 0.5,
            ..Default::default()
        };
        let pass = Volcanoes::new(&params);
        assert!((pass.rim_threshold(3.0) - 2.2).abs() < 1e-12);
        assert!((pass.rim_threshold(1.2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pass_never_raises_terrain() {
        let params = VolcanoParams::default();
        let (mut grid, max_height) = dome();
        let before = grid.clone();
        Volcanoes::new(&params).apply(&mut grid, max_height, &mut Lcg::new(2));
        for (old, new) in before.values().iter().zip(grid.values()) {
            assert!(new <= old);
        }
    }

    #[test]
    fn test_rim_noise_reaches_full_amplitude() {
        // One lattice point per cell, every cell above the highest possible rim.
        let params = VolcanoParams {
            threshold: 1.0,
            threshold_scale: 10.0,
            threshold_amplitude: 0.2,
            max_depth: 0.4,
            crater_scale: 0.5,
        };
        let flat = 1.0 + 2.0 * params.threshold_amplitude;
        let mut grid = ElevationGrid::from_values(41, 41, 0.1, vec![flat; 41 * 41]).unwrap();
        Volcanoes::new(&params).apply(&mut grid, 0.0, &mut Lcg::new(3));

        let (mut lo, mut hi) = (f64::MAX, f64::MIN);
        for &carved in grid.values() {
            let threshold = flat - (flat - carved) / (1.0 + params.crater_scale);
            let offset = (threshold - params.threshold) / params.threshold_amplitude;
            assert!(offset.abs() <= 1.0 + 1e-9, "rim offset {offset} beyond amplitude");
            lo = lo.min(offset);
            hi = hi.max(offset);
        }
        assert!(lo <= -0.9 && hi >= 0.9, "rim offsets span only [{lo}, {hi}]");
    }

    #[test]
    fn test_crater_forms_at_summit() {
        let params = VolcanoParams {
            threshold_amplitude: 0.0,
            ..Default::default()
        };
        let (mut grid, max_height) = dome();
        let pass = Volcanoes::new(&params);
        let rim = pass.rim_threshold(max_height);
        pass.apply(&mut grid, max_height, &mut Lcg::new(2));

        let summit = grid.get(20, 20);
        let depth = rim - summit;
        assert!(depth > 0.0, "summit {summit} should sit below rim {rim}");
        assert!(depth <= params.max_depth + 1e-9, "crater depth {depth} too deep");
        assert!(grid.max_value().unwrap() <= rim + 1e-9);
    }
}
