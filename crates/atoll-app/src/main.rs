//! Island generator entry point.
//!
//! Loads `config.ron`, applies command-line overrides, generates an island,
//! meshes it, scatters flora and optionally writes a heightmap preview.
//!
//! Run with: `cargo run -p atoll-app -- --seed 7 --preview island.png`

mod island;

use std::path::PathBuf;
use std::time::Duration;

use atoll_config::{CliArgs, Config, default_config_dir};
use atoll_terrain::AsyncTerrainGenerator;
use clap::Parser;
use tracing::info;

/// How long to wait for the worker before giving up on an island.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(600);

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".atoll"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Some(log_file) =
        atoll_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config))
    {
        info!("Writing JSON log to {}", log_file.display());
    }

    info!(
        seed = config.seed,
        width = config.terrain.width,
        height = config.terrain.height,
        resolution = config.terrain.resolution,
        "Generating island"
    );

    let generator = AsyncTerrainGenerator::default();
    let (generation, terrain) = island::generate_terrain(&generator, &config, GENERATION_TIMEOUT)?;
    let island = island::build_island(&config, generation, terrain, !args.no_flora)?;

    info!(
        vertices = island.mesh.vertices.len(),
        triangles = island.mesh.triangle_count(),
        vertex_bytes = island.mesh.vertex_buffer_bytes(),
        max_height = island.terrain.max_height,
        "Island meshed"
    );
    if let Some(report) = &island.flora {
        info!(
            planted = report.total_planted(),
            dropped = report.dropped,
            "Flora settled"
        );
    }

    if let Some(path) = &config.debug.preview_path {
        island::write_preview(&island.terrain.grid, config.mesh.waterline, path)?;
        info!("Wrote preview to {}", path.display());
    }

    Ok(())
}
