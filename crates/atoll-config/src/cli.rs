//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Island generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "atoll", about = "Procedural island generator")]
pub struct CliArgs {
    /// Generation seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Island width in world units.
    #[arg(long)]
    pub width: Option<f64>,

    /// Island depth in world units.
    #[arg(long)]
    pub height: Option<f64>,

    /// World units per grid cell.
    #[arg(long)]
    pub resolution: Option<f64>,

    /// Skip the shoreline skirt.
    #[arg(long)]
    pub no_skirt: bool,

    /// Skip flora placement.
    #[arg(long)]
    pub no_flora: bool,

    /// Write a heightmap preview PNG to this path.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(w) = args.width {
            self.terrain.width = w;
        }
        if let Some(h) = args.height {
            self.terrain.height = h;
        }
        if let Some(r) = args.resolution {
            self.terrain.resolution = r;
        }
        if args.no_skirt {
            self.mesh.skirt.enabled = false;
        }
        if let Some(ref path) = args.preview {
            self.debug.preview_path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
