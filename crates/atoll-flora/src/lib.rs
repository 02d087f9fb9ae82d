//! Fertility-driven flora placement: classify the island surface, pick an
//! archetype for each spot, and grow procedurally built entities there.

mod archetype;
mod biome;
mod fertility;
mod params;
mod placement;

pub mod archetypes;
pub mod placer;
pub mod populate;
pub mod render_context;
pub mod scene;
pub mod spawn;

pub use archetype::EntityArchetype;
pub use archetypes::{Planting, build, variant_rng};
pub use biome::{ArchetypeOverride, BiomeDef};
pub use fertility::{FertilityContext, FertilitySampler, GroundProbe};
pub use params::FloraParams;
pub use placement::{PlacementTable, PlacementTier};
pub use placer::{Placement, Placer};
pub use populate::{PopulationReport, poisson_disk_2d, populate};
pub use render_context::{Material, MaterialCache, MaterialId, Quality, RenderContext};
pub use scene::{Entity, EntityHandle, MeshPart, PartShape, Scene, Transform, attach_mesh};
pub use spawn::{SpawnHandle, SpawnScheduler};
