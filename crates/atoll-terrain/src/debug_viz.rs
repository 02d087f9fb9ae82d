//! Debug previews of generated islands.
//!
//! Provides [`DebugImage`] and a color-banded heightmap renderer used by the
//! app to write a PNG preview of each island.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{height_to_color, render_heightmap_debug};
