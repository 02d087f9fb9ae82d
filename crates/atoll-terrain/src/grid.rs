//! Elevation grid storage and bilinear sampling.

use std::ops::{Deref, DerefMut};

use glam::DVec3;

use crate::error::TerrainError;

/// Number of samples needed to cover `extent` world units at `resolution`,
/// boundaries included.
///
/// A tiny tolerance keeps `3.0 / 0.1 = 30.000000000000004` from producing an
/// extra column.
pub fn samples_for_extent(extent: f64, resolution: f64) -> usize {
    ((extent / resolution) - 1e-9).ceil().max(1.0) as usize + 1
}

/// A rectangular grid of height samples centered on the world origin.
///
/// Sample `(x, y)` sits at world position
/// `(x * resolution - half_width, y * resolution - half_height)` on the XZ plane.
/// The grid is never resized after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    resolution: f64,
    half_extent: (f64, f64),
    values: Vec<f64>,
}

impl ElevationGrid {
    /// Create a flat (all-zero) grid covering `world_width × world_height`.
    pub fn new(world_width: f64, world_height: f64, resolution: f64) -> Result<Self, TerrainError> {
        if !(world_width > 0.0 && world_height > 0.0)
            || !world_width.is_finite()
            || !world_height.is_finite()
        {
            return Err(TerrainError::InvalidDimensions {
                width: world_width,
                height: world_height,
            });
        }
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(TerrainError::InvalidResolution(resolution));
        }

        let width = samples_for_extent(world_width, resolution);
        let height = samples_for_extent(world_height, resolution);
        Ok(Self::with_values(width, height, resolution, vec![0.0; width * height]))
    }

    /// Wrap an existing buffer of `width * height` samples.
    pub fn from_values(
        width: usize,
        height: usize,
        resolution: f64,
        values: Vec<f64>,
    ) -> Result<Self, TerrainError> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            return Err(TerrainError::InvalidResolution(resolution));
        }
        if values.len() != width * height {
            return Err(TerrainError::GridShapeMismatch {
                width,
                height,
                expected: width * height,
                actual: values.len(),
            });
        }
        Ok(Self::with_values(width, height, resolution, values))
    }

    fn with_values(width: usize, height: usize, resolution: f64, values: Vec<f64>) -> Self {
        let half_extent = (
            width.saturating_sub(1) as f64 * resolution * 0.5,
            height.saturating_sub(1) as f64 * resolution * 0.5,
        );
        Self {
            width,
            height,
            resolution,
            half_extent,
            values,
        }
    }

    /// Number of samples along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of samples along Z.
    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per cell.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Half of the covered world extent along X and Z.
    pub fn half_extent(&self) -> (f64, f64) {
        self.half_extent
    }

    /// Covered world extent along X and Z.
    pub fn extent(&self) -> (f64, f64) {
        (self.half_extent.0 * 2.0, self.half_extent.1 * 2.0)
    }

    /// Height at sample `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the sample is outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Overwrite the height at sample `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.values[y * self.width + x] = value;
    }

    /// Row-major samples.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Row-major samples, mutable. The slice cannot change the grid's shape.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Highest sample, or `None` for an empty grid.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Convert a centered world XZ position into fractional grid coordinates.
    pub fn world_to_grid(&self, world_x: f64, world_z: f64) -> (f64, f64) {
        (
            (world_x + self.half_extent.0) / self.resolution,
            (world_z + self.half_extent.1) / self.resolution,
        )
    }

    /// Convert grid coordinates into a centered world XZ position.
    pub fn grid_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.resolution - self.half_extent.0,
            y * self.resolution - self.half_extent.1,
        )
    }

    /// Read-only bilinear view returning `default` outside the grid.
    pub fn sampler(&self, default: f64) -> GridSampler<&[f64]> {
        GridSampler::new(&self.values, self.width, self.height, default)
    }

    /// Mutable bilinear view used by erosion to splat height changes.
    pub fn sampler_mut(&mut self, default: f64) -> GridSampler<&mut [f64]> {
        GridSampler::new(&mut self.values, self.width, self.height, default)
    }

    /// Bilinear height at a centered world position, `None` off the grid.
    pub fn height_at(&self, world_x: f64, world_z: f64) -> Option<f64> {
        let (gx, gy) = self.world_to_grid(world_x, world_z);
        let sampler = self.sampler(f64::NAN);
        sampler.contains(gx, gy).then(|| sampler.sample(gx, gy))
    }

    /// Upward surface normal at a centered world position, `None` off the grid.
    pub fn normal_at(&self, world_x: f64, world_z: f64) -> Option<DVec3> {
        let (gx, gy) = self.world_to_grid(world_x, world_z);
        let sampler = self.sampler(0.0);
        if !sampler.contains(gx, gy) {
            return None;
        }
        sampler.normal(gx, gy, self.resolution)
    }
}

/// Bilinear sampler bound to a same-shaped scalar buffer it does not own.
///
/// `B` is `&[f64]` for read-only sampling or `&mut [f64]` when deposits are needed.
pub struct GridSampler<B> {
    values: B,
    width: usize,
    height: usize,
    default: f64,
}

/// Integer cell and fractional offset for a bilinear query.
struct Footprint {
    x: usize,
    y: usize,
    fx: f64,
    fy: f64,
}

impl<B: Deref<Target = [f64]>> GridSampler<B> {
    /// Bind a sampler to `values`, which must hold `width * height` samples.
    pub fn new(values: B, width: usize, height: usize, default: f64) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            values,
            width,
            height,
            default,
        }
    }

    /// Whether `(x, y)` lies inside the sampled area. NaN is never inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.width >= 2
            && self.height >= 2
            && x >= 0.0
            && y >= 0.0
            && x <= (self.width - 1) as f64
            && y <= (self.height - 1) as f64
    }

    fn footprint(&self, x: f64, y: f64) -> Option<Footprint> {
        if !self.contains(x, y) {
            return None;
        }
        let xi = (x as usize).min(self.width - 2);
        let yi = (y as usize).min(self.height - 2);
        Some(Footprint {
            x: xi,
            y: yi,
            fx: x - xi as f64,
            fy: y - yi as f64,
        })
    }

    /// Bilinear sample at a fractional coordinate, or the default outside.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let Some(f) = self.footprint(x, y) else {
            return self.default;
        };
        let i = f.y * self.width + f.x;
        let top = self.values[i] * (1.0 - f.fx) + self.values[i + 1] * f.fx;
        let bottom = self.values[i + self.width] * (1.0 - f.fx) + self.values[i + self.width + 1] * f.fx;
        top * (1.0 - f.fy) + bottom * f.fy
    }

    /// Surface normal from a four-point finite difference, with cells
    /// `resolution` world units apart. `None` when the gradient is degenerate.
    pub fn normal(&self, x: f64, y: f64, resolution: f64) -> Option<DVec3> {
        let left = self.sample(x - 1.0, y);
        let right = self.sample(x + 1.0, y);
        let up = self.sample(x, y - 1.0);
        let down = self.sample(x, y + 1.0);
        DVec3::new(left - right, 2.0 * resolution, up - down).try_normalize()
    }
}

impl<B: DerefMut<Target = [f64]>> GridSampler<B> {
    /// Add `delta` at a fractional coordinate, split over the four surrounding
    /// samples by bilinear weight. Outside the grid this is a no-op.
    pub fn deposit(&mut self, x: f64, y: f64, delta: f64) {
        let Some(f) = self.footprint(x, y) else {
            return;
        };
        let i = f.y * self.width + f.x;
        let w = self.width;
        self.values[i] += delta * (1.0 - f.fx) * (1.0 - f.fy);
        self.values[i + 1] += delta * f.fx * (1.0 - f.fy);
        self.values[i + w] += delta * (1.0 - f.fx) * f.fy;
        self.values[i + w + 1] += delta * f.fx * f.fy;
    }
}
