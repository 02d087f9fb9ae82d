//! Terrain error types.

/// Errors raised before or during terrain generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// The world extent is zero, negative, or not finite.
    #[error("invalid terrain dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested world width.
        width: f64,
        /// Requested world height.
        height: f64,
    },

    /// The grid resolution is zero, negative, not finite, or larger than the domain.
    #[error("invalid grid resolution {0}")]
    InvalidResolution(f64),

    /// The height map needs at least one octave.
    #[error("octave count must be at least 1, got {0}")]
    InvalidOctaves(u32),

    /// A stage parameter is out of its accepted range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Dotted parameter path, e.g. `coastal.wave_height_min`.
        name: &'static str,
        /// What the accepted range is.
        reason: &'static str,
    },

    /// A value buffer does not match the declared grid shape.
    #[error("grid of {width}x{height} needs {expected} samples, got {actual}")]
    GridShapeMismatch {
        /// Grid width in samples.
        width: usize,
        /// Grid height in samples.
        height: usize,
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
}
