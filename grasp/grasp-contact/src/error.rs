//! Error types for contact planning.

use thiserror::Error;

/// Result type for contact planning.
pub type ContactResult<T> = Result<T, ContactError>;

/// Errors for a single digit's planning attempt.
///
/// A failure is fatal for that digit only; the planner keeps solving the
/// sibling digits.
#[derive(Debug, Error)]
pub enum ContactError {
    /// The digit base position has a non-finite component.
    #[error("digit base position has a non-finite component")]
    NonFiniteBase,

    /// Candidate generation produced no usable candidates.
    #[error("no usable contact candidate on the surface")]
    NoCandidates,

    /// Building the deformation cluster for a mesh target failed.
    #[error("surface cluster construction failed: {0}")]
    Cluster(#[from] grasp_surface::SurfaceError),
}
