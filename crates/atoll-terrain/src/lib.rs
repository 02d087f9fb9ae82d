//! Procedural island terrain: seeded noise fields, a fractal height map
//! shaped into an island, and coastal, volcanic and hydraulic erosion passes.

mod error;
mod generator;
mod grid;
mod heightmap;
mod noise_field;
mod params;
mod random;
mod shape;

pub mod async_generation;
pub mod debug_viz;
pub mod erosion;
pub mod math;

pub use async_generation::{
    AsyncTerrainGenerator, Generation, GenerationError, GenerationResult, TerrainRequest,
};
pub use error::TerrainError;
pub use generator::{GeneratedTerrain, TerrainGenerator};
pub use grid::{ElevationGrid, GridSampler, samples_for_extent};
pub use heightmap::{HeightMap, HeightMapSynthesizer, octave_influences};
pub use noise_field::NoiseField;
pub use params::{CoastalParams, HeightMapParams, HydraulicParams, TerrainParameters, VolcanoParams};
pub use random::Lcg;
pub use shape::{ConeShape, FlatShape, Shape};
