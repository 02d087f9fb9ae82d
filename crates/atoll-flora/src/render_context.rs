//! Shared render state handed to archetype constructors.

use hashbrown::HashMap;

/// Opaque handle to a cached material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Flat-colored material description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
}

/// Deduplicates materials by color quantized to 8 bits per channel.
#[derive(Debug, Default)]
pub struct MaterialCache {
    materials: Vec<Material>,
    by_color: HashMap<[u8; 4], MaterialId>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Material for `color`, creating it on first use.
    pub fn material(&mut self, color: [f32; 4]) -> MaterialId {
        let key = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        *self.by_color.entry(key).or_insert_with(|| {
            let id = MaterialId(self.materials.len() as u32);
            self.materials.push(Material { color });
            id
        })
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Geometry detail settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quality {
    /// Multiplier on every segment count, `1.0` for full detail.
    pub poly_throttle: f64,
}

impl Default for Quality {
    fn default() -> Self {
        Self { poly_throttle: 1.0 }
    }
}

impl Quality {
    /// Throttled segment count for a part designed with `base` segments.
    /// Never fewer than three.
    pub fn segments(&self, base: u32) -> u32 {
        ((base as f64 * self.poly_throttle).round() as u32).max(3)
    }
}

/// Material cache plus quality settings.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub materials: MaterialCache,
    pub quality: Quality,
}

impl RenderContext {
    pub fn new(quality: Quality) -> Self {
        Self {
            materials: MaterialCache::new(),
            quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_color_reuses_material() {
        let mut cache = MaterialCache::new();
        let a = cache.material([0.2, 0.5, 0.1, 1.0]);
        let b = cache.material([0.2, 0.5, 0.1, 1.0]);
        let c = cache.material([0.2001, 0.5, 0.1, 1.0]);
        let d = cache.material([0.9, 0.5, 0.1, 1.0]);
        assert_eq!(a, b);
        assert_eq!(a, c, "colors within one quantization step share a material");
        assert_ne!(a, d);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(d).unwrap().color, [0.9, 0.5, 0.1, 1.0]);
    }

    #[test]
    fn test_quality_throttles_segments() {
        let full = Quality::default();
        let low = Quality { poly_throttle: 0.25 };
        assert_eq!(full.segments(12), 12);
        assert_eq!(low.segments(12), 3);
        assert_eq!(low.segments(4), 3, "never below three segments");
    }
}
