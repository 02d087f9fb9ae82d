//! Biome definitions: per-biome placement tables and archetype tweaks.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::archetype::EntityArchetype;
use crate::placement::PlacementTable;

/// Per-archetype adjustments a biome applies on top of the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeOverride {
    /// Multiplier on the target scale.
    pub scale: f64,
    /// Multiplier on every part color.
    pub tint: [f32; 3],
}

impl Default for ArchetypeOverride {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tint: [1.0; 3],
        }
    }
}

/// Full descriptor for a biome, supplied by the caller (usually from config).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeDef {
    /// Display name, e.g. `"tropical_island"`.
    pub name: String,
    pub table: PlacementTable,
    pub overrides: HashMap<EntityArchetype, ArchetypeOverride>,
}

impl BiomeDef {
    /// A biome with the default placement table and no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adjustments for `archetype`, or the identity when none are set.
    pub fn override_for(&self, archetype: EntityArchetype) -> ArchetypeOverride {
        self.overrides.get(&archetype).copied().unwrap_or_default()
    }
}
