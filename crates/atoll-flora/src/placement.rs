//! Weighted archetype selection by food level.

use serde::{Deserialize, Serialize};

use crate::archetype::EntityArchetype;

/// Weights for one food band, walked in order.
///
/// A draw `r` picks the first entry whose cumulative weight exceeds `r`,
/// or `fallback` when the weights run out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementTier {
    /// Exclusive upper food bound for this band.
    pub below_food: f64,
    pub weights: Vec<(EntityArchetype, f64)>,
    pub fallback: EntityArchetype,
}

impl PlacementTier {
    fn pick(&self, r: f64) -> EntityArchetype {
        let mut cumulative = 0.0;
        for &(archetype, weight) in &self.weights {
            cumulative += weight;
            if r < cumulative {
                return archetype;
            }
        }
        self.fallback
    }
}

/// Food-banded selection table. Overridable per biome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTable {
    /// Bands in ascending `below_food` order. Food at or above the last
    /// bound uses the last band.
    pub tiers: Vec<PlacementTier>,
}

impl Default for PlacementTable {
    fn default() -> Self {
        use EntityArchetype::*;
        Self {
            tiers: vec![
                PlacementTier {
                    below_food: 0.35,
                    weights: vec![(Palm, 0.6)],
                    fallback: Bush,
                },
                PlacementTier {
                    below_food: 0.7,
                    weights: vec![(Palm, 0.3), (Tree, 0.45)],
                    fallback: Bush,
                },
                PlacementTier {
                    below_food: f64::INFINITY,
                    weights: vec![(Tree, 0.4), (Palm, 0.3), (FlowerCluster, 0.2)],
                    fallback: Flower,
                },
            ],
        }
    }
}

impl PlacementTable {
    /// Select an archetype for `food` with one uniform draw `r ∈ [0, 1)`.
    ///
    /// Returns `None` only for a table without tiers.
    pub fn select(&self, food: f64, r: f64) -> Option<EntityArchetype> {
        let tier = self
            .tiers
            .iter()
            .find(|tier| food < tier.below_food)
            .or_else(|| self.tiers.last())?;
        Some(tier.pick(r))
    }
}
