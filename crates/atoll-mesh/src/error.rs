/// Preconditions violated by mesh building.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The grid has fewer than two samples along an axis, so it has no quads.
    #[error("cannot mesh a {width}x{height} grid: at least 2x2 samples are required")]
    EmptyGrid { width: usize, height: usize },
    /// The height buffer does not match the declared grid shape.
    #[error("grid declares {expected} samples but holds {actual}")]
    InconsistentGrid { expected: usize, actual: usize },
}
