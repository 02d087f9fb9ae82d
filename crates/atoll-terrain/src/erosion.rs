//! In-place passes that weather a synthesized height map: wave-cut coasts,
//! volcanic craters, and droplet-driven hydraulic erosion.

mod coastal;
mod hydraulic;
mod volcano;

pub use coastal::CoastalErosion;
pub use hydraulic::{DropletTrace, HydraulicErosion};
pub use volcano::Volcanoes;
