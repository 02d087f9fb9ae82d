//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use atoll_flora::{BiomeDef, FloraParams};
use atoll_mesh::MeshParams;
use atoll_terrain::TerrainParameters;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed for terrain generation and flora scattering.
    pub seed: u32,
    /// Island shape and erosion passes.
    pub terrain: TerrainParameters,
    /// Surface mesh banding and shoreline skirt.
    pub mesh: MeshParams,
    /// Entity placement.
    pub flora: FloraParams,
    /// Placement table and per-archetype tweaks for the island's biome.
    pub biome: BiomeDef,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,atoll_terrain=trace").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub file_logging: bool,
    /// Where to write a heightmap preview image, if anywhere.
    pub preview_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 1,
            terrain: TerrainParameters::default(),
            mesh: MeshParams::default(),
            flora: FloraParams::default(),
            biome: BiomeDef::new("island"),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: true,
            preview_path: None,
        }
    }
}

/// Per-user config directory, or `None` on platforms without one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("atoll"))
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_error = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::create_dir_all(config_dir).map_err(write_error)?;
        std::fs::write(&path, serialized).map_err(write_error)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("seed: 1"));
        assert!(ron_str.contains("resolution: 0.1"));
        assert!(ron_str.contains("waterline: 0.25"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(seed: 9, terrain: (width: 40.0))").unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.terrain.width, 40.0);
        assert_eq!(config.terrain.height, TerrainParameters::default().height);
        assert_eq!(config.flora, FloraParams::default());
        assert_eq!(config.mesh, MeshParams::default());
    }

    #[test]
    fn test_biome_section_overrides_archetypes() {
        let config: Config =
            ron::from_str(r#"(biome: (name: "windswept", overrides: {Palm: (scale: 0.5)}))"#)
                .unwrap();
        assert_eq!(config.biome.name, "windswept");
        assert_eq!(config.biome.table, Config::default().biome.table);
        let palm = config.biome.override_for(atoll_flora::EntityArchetype::Palm);
        assert_eq!(palm.scale, 0.5);
        assert_eq!(palm.tint, [1.0; 3]);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.seed = 1337;
        config.terrain.resolution = 0.2;
        config.mesh.skirt.enabled = false;
        config.debug.preview_path = Some(PathBuf::from("island.png"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("atoll");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.flora.spacing = 1.2;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(reloaded.map(|c| c.flora.spacing), Some(1.2));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        let message = result.unwrap_err().to_string();
        assert!(message.contains(CONFIG_FILE), "{message}");
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// generated island\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
