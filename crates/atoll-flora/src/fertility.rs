//! Ecological classification of points on the island surface.

use atoll_terrain::ElevationGrid;
use atoll_terrain::math::{det_sin, smoothstep};
use glam::DVec3;

/// Ecology at one surface point, computed fresh per query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FertilityContext {
    /// Terrain height at the point.
    pub altitude: f64,
    /// How much the ground can sustain, in `[0, 1]`.
    pub food: f64,
    /// Ground wetness, in `[0, 1]`.
    pub moisture: f64,
    /// Alias of `food`.
    pub fertility: f64,
}

impl FertilityContext {
    /// Classify world position `(x, z)` lying at `altitude`.
    ///
    /// Food fades out with height, reaching zero `2.1` units up; a pair of
    /// low-frequency sine waves breaks it into patches and drives moisture.
    pub fn from_altitude(x: f64, z: f64, altitude: f64) -> Self {
        let n = det_sin(x * 0.11 + z * 0.07) + det_sin(x * 0.05 - z * 0.13);
        let food = ((0.6 + n * 0.4) * smoothstep(0.1, 1.5, 2.2 - altitude)).clamp(0.0, 1.0);
        let moisture = ((n + 2.0) / 4.0).clamp(0.0, 1.0);
        Self {
            altitude,
            food,
            moisture,
            fertility: food,
        }
    }

    /// Whether nothing can grow here.
    pub fn is_barren(&self) -> bool {
        self.food <= 0.0
    }
}

/// Height and surface orientation found by probing the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    pub altitude: f64,
    /// Unit surface normal, `y` up.
    pub normal: DVec3,
}

/// Samples fertility from an elevation grid.
#[derive(Clone, Copy, Debug)]
pub struct FertilitySampler<'a> {
    grid: &'a ElevationGrid,
    min_normal_y: f64,
}

impl<'a> FertilitySampler<'a> {
    /// `min_normal_y` is the flattest-allowed slope for placement: probes
    /// whose normal has a smaller vertical component are rejected.
    pub fn new(grid: &'a ElevationGrid, min_normal_y: f64) -> Self {
        Self { grid, min_normal_y }
    }

    pub fn grid(&self) -> &'a ElevationGrid {
        self.grid
    }

    /// Find the ground under world position `(x, z)`; `None` off the grid.
    pub fn probe(&self, x: f64, z: f64) -> Option<GroundProbe> {
        let altitude = self.grid.height_at(x, z)?;
        let normal = self.grid.normal_at(x, z).unwrap_or(DVec3::Y);
        Some(GroundProbe { altitude, normal })
    }

    /// Whether `probe` is level enough to place on.
    pub fn is_placeable(&self, probe: &GroundProbe) -> bool {
        probe.normal.y >= self.min_normal_y
    }

    /// Fertility at `(x, z)`, or `None` off the grid.
    pub fn sample(&self, x: f64, z: f64) -> Option<FertilityContext> {
        let probe = self.probe(x, z)?;
        Some(FertilityContext::from_altitude(x, z, probe.altitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_outputs_in_range_for_extreme_altitudes() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..10_000 {
            let x = rng.random_range(-500.0..500.0);
            let z = rng.random_range(-500.0..500.0);
            for altitude in [-1e9, -50.0, -1.0, 0.0, 0.5, 2.0, 50.0, 1e9] {
                let ctx = FertilityContext::from_altitude(x, z, altitude);
                assert!((0.0..=1.0).contains(&ctx.food), "food {} at {altitude}", ctx.food);
                assert!(
                    (0.0..=1.0).contains(&ctx.moisture),
                    "moisture {} at {altitude}",
                    ctx.moisture
                );
                assert_eq!(ctx.fertility, ctx.food);
                assert_eq!(ctx.altitude, altitude);
            }
        }
    }

    #[test]
    fn test_high_ground_is_barren() {
        for (x, z) in [(0.0, 0.0), (3.0, -7.0), (12.5, 4.0)] {
            assert!(FertilityContext::from_altitude(x, z, 2.15).is_barren());
            assert!(FertilityContext::from_altitude(x, z, 40.0).is_barren());
        }
    }

    #[test]
    fn test_origin_lowland_values() {
        // n = 0 at the origin, and altitude 0 is fully inside the smoothstep plateau.
        let ctx = FertilityContext::from_altitude(0.0, 0.0, 0.0);
        assert!((ctx.food - 0.6).abs() < 1e-12);
        assert!((ctx.moisture - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probe_off_grid_is_none() {
        let grid = ElevationGrid::new(4.0, 4.0, 0.5).unwrap();
        let sampler = FertilitySampler::new(&grid, 0.8);
        assert!(sampler.probe(0.0, 0.0).is_some());
        assert!(sampler.probe(2.5, 0.0).is_none());
        assert!(sampler.sample(0.0, -3.0).is_none());
    }

    #[test]
    fn test_steep_ground_not_placeable() {
        let values = (0..81).map(|i| (i % 9) as f64 * 0.5).collect();
        let steep = ElevationGrid::from_values(9, 9, 0.5, values).unwrap();
        let sampler = FertilitySampler::new(&steep, 0.8);
        let probe = sampler.probe(0.0, 0.0).unwrap();
        assert!(!sampler.is_placeable(&probe), "normal {:?}", probe.normal);

        let flat = ElevationGrid::new(4.0, 4.0, 0.5).unwrap();
        let sampler = FertilitySampler::new(&flat, 0.8);
        let probe = sampler.probe(0.3, 0.3).unwrap();
        assert!(sampler.is_placeable(&probe));
    }
}
