//! The generation pipeline: terrain, surface mesh, flora.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use atoll_config::Config;
use atoll_flora::{Placer, PopulationReport, populate};
use atoll_mesh::{PackedSurfaceMesh, SurfaceMeshBuilder};
use atoll_terrain::debug_viz::render_heightmap_debug;
use atoll_terrain::{
    AsyncTerrainGenerator, ElevationGrid, GeneratedTerrain, Generation, TerrainRequest,
};
use tracing::{debug, info};

/// Spawn animations are stepped at this rate once flora is planted.
const SETTLE_STEP: f64 = 1.0 / 60.0;

/// A fully built island.
pub struct Island {
    pub generation: Generation,
    pub terrain: GeneratedTerrain,
    pub mesh: PackedSurfaceMesh,
    /// `None` when flora placement was skipped.
    pub flora: Option<PopulationReport>,
}

/// Generate terrain for `config` on the background worker and wait for it.
pub fn generate_terrain(
    generator: &AsyncTerrainGenerator,
    config: &Config,
    timeout: Duration,
) -> anyhow::Result<(Generation, GeneratedTerrain)> {
    let generation = generator
        .submit(TerrainRequest {
            params: config.terrain.clone(),
            seed: config.seed,
        })
        .map_err(|_| anyhow!("terrain request queue is full"))?;

    let result = generator
        .recv_latest(timeout)?
        .with_context(|| format!("terrain generation timed out after {timeout:?}"))?;
    let terrain = result.terrain.context("terrain generation failed")?;

    info!(
        generation = generation.0,
        time_ms = result.generation_time_us / 1000,
        "Terrain generated"
    );
    Ok((generation, terrain))
}

/// Mesh the terrain and, if `with_flora`, populate it and let every spawn
/// animation finish.
pub fn build_island(
    config: &Config,
    generation: Generation,
    terrain: GeneratedTerrain,
    with_flora: bool,
) -> anyhow::Result<Island> {
    let mesh = SurfaceMeshBuilder::new(&config.mesh)
        .build(&terrain.grid)
        .context("meshing island surface")?;
    let mesh = PackedSurfaceMesh::from_mesh(&mesh);

    let flora = with_flora.then(|| {
        let mut placer = Placer::new(
            terrain.grid.clone(),
            generation,
            config.biome.clone(),
            config.flora.clone(),
        );
        let report = populate(&mut placer, u64::from(config.seed));
        settle(&mut placer);
        report
    });

    Ok(Island {
        generation,
        terrain,
        mesh,
        flora,
    })
}

fn settle(placer: &mut Placer) {
    let params = placer.params();
    let budget = params.max_spawn_delay + params.spawn_duration;
    let mut elapsed = 0.0;
    while !placer.spawns_idle() && elapsed <= budget + SETTLE_STEP {
        placer.tick(SETTLE_STEP);
        elapsed += SETTLE_STEP;
    }
    debug!(elapsed, idle = placer.spawns_idle(), "spawn animations settled");
}

/// Render the heightmap and save it as an image; the format follows the
/// file extension.
pub fn write_preview(grid: &ElevationGrid, waterline: f64, path: &Path) -> anyhow::Result<()> {
    let preview = render_heightmap_debug(grid, waterline);
    let (width, height) = preview.dimensions();
    let buffer = image::RgbaImage::from_raw(width, height, preview.into_raw())
        .context("preview buffer does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("writing preview to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.seed = 3;
        config.terrain.width = 8.0;
        config.terrain.height = 8.0;
        config.terrain.resolution = 0.2;
        config
    }

    #[test]
    fn test_pipeline_builds_island_with_flora() {
        let config = small_config();
        let generator = AsyncTerrainGenerator::new(2);
        let (generation, terrain) =
            generate_terrain(&generator, &config, Duration::from_secs(60)).unwrap();
        assert_eq!(generation, Generation(1));
        assert_eq!(terrain.grid.width(), 41);

        let island = build_island(&config, generation, terrain, true).unwrap();
        assert!(!island.mesh.is_empty());
        assert!(island.flora.is_some());
    }

    #[test]
    fn test_config_biome_drives_placement() {
        use atoll_flora::{EntityArchetype, PlacementTable, PlacementTier};

        let mut config = small_config();
        config.biome.name = "scrub".into();
        config.biome.table = PlacementTable {
            tiers: vec![PlacementTier {
                below_food: 1.0,
                weights: Vec::new(),
                fallback: EntityArchetype::Bush,
            }],
        };
        let generator = AsyncTerrainGenerator::new(2);
        let (generation, terrain) =
            generate_terrain(&generator, &config, Duration::from_secs(60)).unwrap();
        let island = build_island(&config, generation, terrain, true).unwrap();

        let report = island.flora.unwrap();
        for archetype in report.planted.keys() {
            assert!(
                matches!(archetype, EntityArchetype::Bush | EntityArchetype::Rock),
                "scrub biome planted {archetype}"
            );
        }
    }

    #[test]
    fn test_flora_can_be_skipped() {
        let config = small_config();
        let generator = AsyncTerrainGenerator::new(2);
        let (generation, terrain) =
            generate_terrain(&generator, &config, Duration::from_secs(60)).unwrap();
        let island = build_island(&config, generation, terrain, false).unwrap();
        assert!(island.flora.is_none());
    }

    #[test]
    fn test_invalid_parameters_surface_as_error() {
        let mut config = small_config();
        config.terrain.resolution = 0.0;
        let generator = AsyncTerrainGenerator::new(2);
        assert!(generate_terrain(&generator, &config, Duration::from_secs(60)).is_err());
    }

    #[test]
    fn test_preview_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("island.png");
        let values = (0..16).map(|i| i as f64 * 0.1).collect();
        let grid = ElevationGrid::from_values(4, 4, 1.0, values).unwrap();

        write_preview(&grid, 0.25, &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }
}
