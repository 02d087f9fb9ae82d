//! Island surface meshing: height-banded triangulation of an elevation
//! grid, marching-squares shoreline extraction, and the underwater skirt.

mod error;
mod params;

pub mod contour;
pub mod packed;
pub mod skirt;
pub mod surface;

pub use contour::{Contour, extract_contours};
pub use error::MeshError;
pub use packed::{PackedSurfaceMesh, TerrainVertex};
pub use params::{MeshParams, SkirtParams};
pub use skirt::add_skirt;
pub use surface::{SurfaceMesh, SurfaceMeshBuilder};
