//! Error types for the curl solver.

use thiserror::Error;

/// Result type for curl operations.
pub type CurlResult<T> = Result<T, CurlError>;

/// Precondition violations in finger geometry.
#[derive(Debug, Error)]
pub enum CurlError {
    /// A phalanx length is non-positive.
    #[error("phalanx {index} has non-positive length {length}")]
    InvalidPhalanxLength {
        /// Phalanx index (0 = proximal).
        index: usize,
        /// The offending length.
        length: f64,
    },

    /// The forward direction and flexion axis are parallel or degenerate,
    /// leaving the bend plane undefined.
    #[error("forward direction and flexion axis do not span a bend plane")]
    DegenerateAxes,

    /// The base joint position has a non-finite component.
    #[error("base joint position has a non-finite component")]
    NonFiniteBase,
}
