//! Error types for surface cluster operations.

use thiserror::Error;

/// Result type for surface cluster operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur building or evaluating a surface cluster.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The mesh has no faces to anchor to.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// No triangle lies within the requested search radius of the query.
    #[error("no triangle within radius {radius} of the query point")]
    NoTriangleInRadius {
        /// The search radius that was applied.
        radius: f64,
    },

    /// An anchor references a face the mesh does not have.
    ///
    /// This means the mesh passed to `evaluate` does not share the topology
    /// the cluster was built against — a caller precondition violation.
    #[error("anchor references face {face} but mesh has {face_count} faces")]
    AnchorOutOfBounds {
        /// Offending face index.
        face: u32,
        /// Face count of the mesh being evaluated.
        face_count: usize,
    },
}
