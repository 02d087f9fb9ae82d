//! Droplet-based hydraulic erosion.
//!
//! Each droplet starts at a random point, follows the surface normal
//! downhill with friction-damped velocity, erodes in proportion to
//! steepness and redeposits carried sediment on gentler ground. All height
//! changes go through bilinear deposits at the droplet's previous position.
//! A single 3×3 blur afterwards smooths simulation noise.

use rand::Rng;
use tracing::trace;

use crate::grid::{ElevationGrid, GridSampler};
use crate::params::HydraulicParams;

/// Normals with a vertical component at or above this count as flat ground.
const FLAT_NORMAL_Y: f64 = 1.0 - 1e-9;

/// Summary of a single droplet's path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropletTrace {
    /// Steps taken before the droplet stopped.
    pub steps: u32,
    /// Sediment still carried when the droplet stopped.
    pub sediment: f64,
}

/// Simulates rainfall erosion over an [`ElevationGrid`].
pub struct HydraulicErosion<'a> {
    params: &'a HydraulicParams,
}

impl<'a> HydraulicErosion<'a> {
    /// Bind the pass to its parameters.
    pub fn new(params: &'a HydraulicParams) -> Self {
        Self { params }
    }

    /// Number of droplets simulated for a `width × height` grid.
    pub fn droplet_count(&self, width: usize, height: usize) -> usize {
        let cells = width.saturating_sub(1) * height.saturating_sub(1);
        (self.params.drops_per_cell * cells as f64) as usize
    }

    /// Run every droplet, then blur the interior once.
    pub fn apply<R: Rng + ?Sized>(&self, grid: &mut ElevationGrid, rng: &mut R) {
        let (width, height) = (grid.width(), grid.height());
        let resolution = grid.resolution();
        let (extent_x, extent_y) = grid.extent();
        let drops = self.droplet_count(width, height);

        let mut total_steps = 0u64;
        {
            let mut sampler = grid.sampler_mut(0.0);
            for _ in 0..drops {
                let x = rng.random::<f64>() * extent_x;
                let y = rng.random::<f64>() * extent_y;
                let droplet = self.trace(&mut sampler, resolution, x, y, rng);
                total_steps += droplet.steps as u64;
            }
        }
        trace!(drops, total_steps, "hydraulic droplets finished");

        blur(grid);
    }

    /// Trace one droplet starting at domain-local world position `(x, y)`.
    ///
    /// The droplet stops on flat ground, after `max_iterations` steps, when
    /// its velocity stops being finite, or once it leaves the grid.
    pub fn trace<B, R>(
        &self,
        sampler: &mut GridSampler<B>,
        resolution: f64,
        mut x: f64,
        mut y: f64,
        rng: &mut R,
    ) -> DropletTrace
    where
        B: std::ops::DerefMut<Target = [f64]>,
        R: Rng + ?Sized,
    {
        let p = self.params;
        let reach = p.radius * resolution;
        let ox = (rng.random::<f64>() * 2.0 - 1.0) * reach;
        let oy = (rng.random::<f64>() * 2.0 - 1.0) * reach;

        let (mut previous_x, mut previous_y) = (x, y);
        let (mut vx, mut vy) = (0.0, 0.0);
        let mut sediment = 0.0;
        let mut steps = 0;

        for i in 0..p.max_iterations {
            let Some(normal) = sampler.normal((x + ox) / resolution, (y + oy) / resolution, resolution)
            else {
                break;
            };
            if normal.y >= FLAT_NORMAL_Y {
                break;
            }

            let deposit = sediment * p.deposition_rate * normal.y;
            let erosion =
                p.erosion_rate * (1.0 - normal.y) * (i as f64 * p.iteration_scale).min(1.0);
            sampler.deposit(previous_x / resolution, previous_y / resolution, deposit - erosion);

            let next_vx = p.friction * vx + normal.x * p.speed * resolution;
            let next_vy = p.friction * vy + normal.z * p.speed * resolution;
            if !next_vx.is_finite() || !next_vy.is_finite() {
                break;
            }
            vx = next_vx;
            vy = next_vy;

            previous_x = x;
            previous_y = y;
            x += vx;
            y += vy;
            sediment += erosion - deposit;
            steps += 1;

            if !sampler.contains(x / resolution, y / resolution) {
                break;
            }
        }

        DropletTrace { steps, sediment }
    }
}

/// Weighted 3×3 blur over interior cells: corners 1/16, edges 1/8, center 1/4.
pub fn blur(grid: &mut ElevationGrid) {
    let (width, height) = (grid.width(), grid.height());
    if width < 3 || height < 3 {
        return;
    }
    let source = grid.values().to_vec();
    let at = |x: usize, y: usize| source[y * width + x];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let corners = at(x - 1, y - 1) + at(x + 1, y - 1) + at(x - 1, y + 1) + at(x + 1, y + 1);
            let edges = at(x, y - 1) + at(x - 1, y) + at(x + 1, y) + at(x, y + 1);
            grid.set(x, y, corners / 16.0 + edges / 8.0 + at(x, y) / 4.0);
        }
    }
}
