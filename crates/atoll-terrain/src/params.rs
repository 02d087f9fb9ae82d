//! Terrain generation parameters and their validation.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Everything needed to generate one island. Immutable once generation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParameters {
    /// Domain width in world units.
    pub width: f64,
    /// Domain depth (Z) in world units.
    pub height: f64,
    /// World units per grid cell.
    pub resolution: f64,
    /// Exponent of the island cone mask.
    pub shape_power: f64,
    /// Fractal height map stage.
    pub height_map: HeightMapParams,
    /// Wave-cut shoreline stage.
    pub coastal: CoastalParams,
    /// Crater carving stage.
    pub volcano: VolcanoParams,
    /// Droplet erosion stage.
    pub hydraulic: HydraulicParams,
}

/// Fractal noise sum configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapParams {
    /// Number of noise octaves.
    pub octaves: u32,
    /// Noise lattice cells per world unit for the first octave.
    pub scale: f64,
    /// Lattice scale multiplier between successive octaves.
    pub scale_falloff: f64,
    /// Influence multiplier between successive octaves.
    pub influence_falloff: f64,
    /// Peak height in world units before the shape mask.
    pub amplitude: f64,
    /// Exponent applied to the normalized fractal sum.
    pub height_power: f64,
}

/// Wave-cut shoreline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoastalParams {
    /// Lowest wave height; cells below the local wave height are compressed.
    pub wave_height_min: f64,
    /// Highest wave height.
    pub wave_height_max: f64,
    /// Noise lattice cells per world unit.
    pub noise_scale: f64,
    /// Compression exponent.
    pub power: f64,
}

/// Crater carving configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoParams {
    /// Lower bound of the crater rim height.
    pub threshold: f64,
    /// Rim noise lattice cells per world unit.
    pub threshold_scale: f64,
    /// Rim height perturbation, applied as `±threshold_amplitude`.
    pub threshold_amplitude: f64,
    /// Deepest a crater may bite below the rim.
    pub max_depth: f64,
    /// Over-correction factor carving the crater bowl.
    pub crater_scale: f64,
}

/// Droplet erosion configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicParams {
    /// Droplets simulated per grid cell.
    pub drops_per_cell: f64,
    /// Height removed per step at full steepness.
    pub erosion_rate: f64,
    /// Fraction of carried sediment dropped per step on flat ground.
    pub deposition_rate: f64,
    /// Acceleration along the downhill normal.
    pub speed: f64,
    /// Velocity retained between steps.
    pub friction: f64,
    /// Capture radius in cells.
    pub radius: f64,
    /// Step budget per droplet.
    pub max_iterations: u32,
    /// Ramp-up of erosion over the first steps.
    pub iteration_scale: f64,
}

impl Default for TerrainParameters {
    fn default() -> Self {
        Self {
            width: 25.0,
            height: 25.0,
            resolution: 0.1,
            shape_power: 2.0,
            height_map: HeightMapParams::default(),
            coastal: CoastalParams::default(),
            volcano: VolcanoParams::default(),
            hydraulic: HydraulicParams::default(),
        }
    }
}

impl Default for HeightMapParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            scale: 0.35,
            scale_falloff: 2.0,
            influence_falloff: 0.5,
            amplitude: 5.0,
            height_power: 1.3,
        }
    }
}

impl Default for CoastalParams {
    fn default() -> Self {
        Self {
            wave_height_min: 0.15,
            wave_height_max: 0.45,
            noise_scale: 0.4,
            power: 2.0,
        }
    }
}

impl Default for VolcanoParams {
    fn default() -> Self {
        Self {
            threshold: 1.6,
            threshold_scale: 0.5,
            threshold_amplitude: 0.1,
            max_depth: 0.4,
            crater_scale: 0.6,
        }
    }
}

impl Default for HydraulicParams {
    fn default() -> Self {
        Self {
            drops_per_cell: 0.3,
            erosion_rate: 0.0015,
            deposition_rate: 0.1,
            speed: 0.15,
            friction: 0.7,
            radius: 0.8,
            max_iterations: 64,
            iteration_scale: 0.05,
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), TerrainError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::InvalidParameter {
            name,
            reason: "must be positive and finite",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), TerrainError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::InvalidParameter {
            name,
            reason: "must be non-negative and finite",
        })
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), TerrainError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TerrainError::InvalidParameter {
            name,
            reason: "must lie in [0, 1]",
        })
    }
}

impl TerrainParameters {
    /// Reject configurations that would yield degenerate or NaN-filled grids.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`TerrainError`].
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(TerrainError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.resolution > 0.0)
            || !self.resolution.is_finite()
            || self.resolution > self.width.min(self.height)
        {
            return Err(TerrainError::InvalidResolution(self.resolution));
        }
        positive("shape_power", self.shape_power)?;
        self.height_map.validate()?;
        self.coastal.validate()?;
        self.volcano.validate()?;
        self.hydraulic.validate()
    }
}

impl HeightMapParams {
    fn validate(&self) -> Result<(), TerrainError> {
        if self.octaves == 0 {
            return Err(TerrainError::InvalidOctaves(self.octaves));
        }
        positive("height_map.scale", self.scale)?;
        positive("height_map.scale_falloff", self.scale_falloff)?;
        positive("height_map.influence_falloff", self.influence_falloff)?;
        non_negative("height_map.amplitude", self.amplitude)?;
        positive("height_map.height_power", self.height_power)
    }
}

impl CoastalParams {
    fn validate(&self) -> Result<(), TerrainError> {
        positive("coastal.wave_height_min", self.wave_height_min)?;
        positive("coastal.wave_height_max", self.wave_height_max)?;
        if self.wave_height_max < self.wave_height_min {
            return Err(TerrainError::InvalidParameter {
                name: "coastal.wave_height_max",
                reason: "must not be below wave_height_min",
            });
        }
        positive("coastal.noise_scale", self.noise_scale)?;
        non_negative("coastal.power", self.power)
    }
}

impl VolcanoParams {
    fn validate(&self) -> Result<(), TerrainError> {
        non_negative("volcano.threshold", self.threshold)?;
        positive("volcano.threshold_scale", self.threshold_scale)?;
        non_negative("volcano.threshold_amplitude", self.threshold_amplitude)?;
        non_negative("volcano.max_depth", self.max_depth)?;
        positive("volcano.crater_scale", self.crater_scale)
    }
}

impl HydraulicParams {
    fn validate(&self) -> Result<(), TerrainError> {
        non_negative("hydraulic.drops_per_cell", self.drops_per_cell)?;
        non_negative("hydraulic.erosion_rate", self.erosion_rate)?;
        unit_interval("hydraulic.deposition_rate", self.deposition_rate)?;
        non_negative("hydraulic.speed", self.speed)?;
        if !(0.0..1.0).contains(&self.friction) {
            return Err(TerrainError::InvalidParameter {
                name: "hydraulic.friction",
                reason: "must lie in [0, 1)",
            });
        }
        non_negative("hydraulic.radius", self.radius)?;
        non_negative("hydraulic.iteration_scale", self.iteration_scale)
    }
}
