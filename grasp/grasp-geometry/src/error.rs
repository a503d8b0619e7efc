//! Error types for geometric primitives.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur in geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// No interpolation constraints were supplied.
    #[error("RBF system has no constraint points")]
    NoConstraints,

    /// The RBF system stayed singular through every regularization retry.
    #[error("RBF system is singular even with ridge regularization {max_ridge}")]
    SingularSystem {
        /// Strongest regularization that was attempted.
        max_ridge: f64,
    },

    /// Constraint point sets have mismatched lengths.
    #[error("constraint sources ({sources}) and displacements ({displacements}) differ in length")]
    MismatchedConstraints {
        /// Number of source points.
        sources: usize,
        /// Number of displacement vectors.
        displacements: usize,
    },
}
