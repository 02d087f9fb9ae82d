//! Flora placement settings.

use serde::{Deserialize, Serialize};

/// Tunables for placement, batch population and spawn animations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloraParams {
    /// Smallest surface-normal `y` that can hold an entity.
    pub min_normal_y: f64,
    /// Target scale at zero food.
    pub base_scale: f64,
    /// Extra target scale at full food.
    pub food_scale: f64,
    /// Lowest ground batch population plants on, keeping entities out of the water.
    pub min_altitude: f64,
    /// Minimum distance between batch-populated entities.
    pub spacing: f64,
    /// Best-candidate attempts per accepted batch point.
    pub candidate_attempts: u32,
    /// Spawn animations start after a random delay below this, in seconds.
    pub max_spawn_delay: f64,
    /// Length of one spawn animation, in seconds.
    pub spawn_duration: f64,
    /// Segment-count multiplier for entity geometry.
    pub poly_throttle: f64,
}

impl Default for FloraParams {
    fn default() -> Self {
        Self {
            min_normal_y: 0.7,
            base_scale: 3.5,
            food_scale: 3.5,
            min_altitude: 0.3,
            spacing: 0.6,
            candidate_attempts: 20,
            max_spawn_delay: 2.0,
            spawn_duration: 0.8,
            poly_throttle: 1.0,
        }
    }
}

impl FloraParams {
    /// Target scale for ground with `food` in `[0, 1]`.
    pub fn target_scale(&self, food: f64) -> f64 {
        self.base_scale + food * self.food_scale
    }
}
