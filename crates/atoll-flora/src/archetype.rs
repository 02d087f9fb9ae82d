//! The closed set of things that can grow on the island.

use serde::{Deserialize, Serialize};

/// Entity kinds the placement rules choose between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityArchetype {
    Tree,
    Palm,
    Bush,
    Flower,
    FlowerCluster,
    Rock,
}

impl EntityArchetype {
    pub const ALL: [EntityArchetype; 6] = [
        Self::Tree,
        Self::Palm,
        Self::Bush,
        Self::Flower,
        Self::FlowerCluster,
        Self::Rock,
    ];

    /// Lowercase name used in logs and config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Palm => "palm",
            Self::Bush => "bush",
            Self::Flower => "flower",
            Self::FlowerCluster => "flower_cluster",
            Self::Rock => "rock",
        }
    }
}

impl std::fmt::Display for EntityArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = EntityArchetype::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EntityArchetype::ALL.len());
    }
}
