//! Heightmap preview rendering.

use super::image::DebugImage;
use crate::grid::ElevationGrid;

const DEEP_WATER: [u8; 3] = [12, 40, 110];
const SHALLOW_WATER: [u8; 3] = [40, 120, 190];
const SAND: [u8; 3] = [220, 200, 130];
const GRASS: [u8; 3] = [70, 150, 60];
const ROCK: [u8; 3] = [120, 100, 80];
const SNOW: [u8; 3] = [240, 240, 245];

/// Render `grid` one pixel per sample, colored by elevation relative to
/// `waterline` and the grid's highest cell.
///
/// Row `y` of the image is grid row `y`, so the image's top edge is the
/// grid's `-z` edge.
pub fn render_heightmap_debug(grid: &ElevationGrid, waterline: f64) -> DebugImage {
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    let mut image = DebugImage::new(width, height);
    let peak = grid.max_value().unwrap_or(waterline);

    for y in 0..height {
        for x in 0..width {
            let h = grid.get(x as usize, y as usize);
            let [r, g, b] = height_to_color(h, waterline, peak);
            image.set_pixel(x, y, [r, g, b, 255]);
        }
    }

    image
}

/// Map an elevation to an RGB color.
///
/// Below `waterline` the color blends from deep to shallow water; above it
/// the bands run sand, grass, rock, snow over `waterline..peak`.
pub fn height_to_color(height: f64, waterline: f64, peak: f64) -> [u8; 3] {
    if !height.is_finite() {
        return [255, 0, 255];
    }
    if height < waterline {
        let depth = ((waterline - height) / waterline.abs().max(1e-6)).clamp(0.0, 1.0);
        return lerp(SHALLOW_WATER, DEEP_WATER, depth);
    }

    let span = (peak - waterline).max(1e-6);
    let t = ((height - waterline) / span).clamp(0.0, 1.0);
    if t < 0.05 {
        SAND
    } else if t < 0.55 {
        lerp(GRASS, ROCK, (t - 0.05) / 0.5)
    } else if t < 0.85 {
        ROCK
    } else {
        lerp(ROCK, SNOW, (t - 0.85) / 0.15)
    }
}

fn lerp(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}
