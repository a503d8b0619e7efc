//! Error types for the IK solver.

use thiserror::Error;

/// Result type for IK operations.
pub type IkResult<T> = Result<T, IkError>;

/// Errors that abort a solve before iteration starts.
///
/// These are precondition violations. Numerical non-convergence is *not* an
/// error: the solver returns a best-effort solution with `converged = false`.
/// A failure here is fatal for the offending chain only; sibling chains are
/// unaffected.
#[derive(Debug, Error)]
pub enum IkError {
    /// The target position contains a non-finite component.
    #[error("target position has a non-finite component")]
    NonFiniteTarget,

    /// A joint position in the chain is non-finite.
    #[error("joint {index} has a non-finite position")]
    NonFiniteJoint {
        /// Index of the offending joint.
        index: usize,
    },
}
