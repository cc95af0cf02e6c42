//! Error types
//!
//! Only structural caller mistakes are errors. Degenerate parameter values
//! (zero lengths, coincident frames, empty sweeps) build degenerate geometry
//! instead.

/// Structural precondition violated by a geometry builder's caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Lathe profile needs at least two points
    #[error("profile has {0} point(s), at least 2 are required")]
    ProfileTooShort(usize),

    /// Radial or longitudinal segment count of zero
    #[error("segment count must be at least 1")]
    NoSegments,

    /// Truss needs at least two nodes to form a segment
    #[error("truss has {0} node(s), at least 2 are required")]
    TrussTooShort(usize),
}

/// Errors surfaced by whole-ship builds, caching and export
#[derive(Debug, thiserror::Error)]
pub enum ShipError {
    #[error("geometry build failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("failed to serialize parameters: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}
