//! Error types for distance field construction.

use thiserror::Error;

/// Result type for distance field construction.
pub type SdfResult<T> = Result<T, SdfError>;

/// Errors that can occur constructing a distance field.
#[derive(Debug, Error)]
pub enum SdfError {
    /// Mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A primitive was given a non-positive dimension.
    #[error("{primitive} requires a positive {dimension}, got {value}")]
    InvalidDimension {
        /// Primitive kind ("sphere", "cylinder", ...).
        primitive: &'static str,
        /// Offending dimension name ("radius", "half height", ...).
        dimension: &'static str,
        /// The value supplied.
        value: f64,
    },

    /// A union was built with no member fields.
    #[error("union has no member fields")]
    EmptyUnion,
}
