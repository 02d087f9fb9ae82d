//! Mesh appearance and skirt settings.

use serde::{Deserialize, Serialize};

/// Height bands and skirt settings for [`SurfaceMeshBuilder`](crate::SurfaceMeshBuilder).
///
/// Bands are, from low to high: underwater (below `waterline`), shoreline
/// (below `shore_height`), hills (below `hill_height`), peaks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Elevation of the water surface.
    pub waterline: f64,
    pub shore_height: f64,
    pub hill_height: f64,
    pub underwater_color: [f32; 4],
    pub shore_color: [f32; 4],
    pub hill_color: [f32; 4],
    pub peak_color: [f32; 4],
    pub skirt: SkirtParams,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            waterline: 0.25,
            shore_height: 0.45,
            hill_height: 1.6,
            underwater_color: [0.62, 0.56, 0.38, 1.0],
            shore_color: [0.93, 0.84, 0.60, 1.0],
            hill_color: [0.33, 0.55, 0.22, 1.0],
            peak_color: [0.45, 0.40, 0.36, 1.0],
            skirt: SkirtParams::default(),
        }
    }
}

impl MeshParams {
    /// Color of the band containing `height`.
    pub fn band_color(&self, height: f64) -> [f32; 4] {
        if height < self.waterline {
            self.underwater_color
        } else if height < self.shore_height {
            self.shore_color
        } else if height < self.hill_height {
            self.hill_color
        } else {
            self.peak_color
        }
    }
}

/// The sloping underwater apron extruded from each closed shoreline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkirtParams {
    pub enabled: bool,
    /// Number of ring steps between the shoreline and the skirt's outer edge.
    pub rings: u32,
    /// Shapes the ring spacing: ring `i` sits at `(i / rings)^exponent`.
    pub exponent: f64,
    /// Horizontal distance from the shoreline to the outermost ring.
    pub outward_distance: f64,
    /// Vertical drop from the waterline to the outermost ring.
    pub depth: f64,
}

impl Default for SkirtParams {
    fn default() -> Self {
        Self {
            enabled: true,
            rings: 6,
            exponent: 1.5,
            outward_distance: 4.0,
            depth: 2.0,
        }
    }
}
