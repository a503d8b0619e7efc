//! Error types for the foundation crate.

use thiserror::Error;

/// Result type for fallible constructors in this crate.
pub type TypesResult<T> = Result<T, MeshError>;

/// Errors raised by mesh construction and deformation updates.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Mesh has no faces.
    #[error("mesh has no faces")]
    Empty,

    /// A face references a vertex index outside the position buffer.
    #[error("face {face} references vertex {vertex} but mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        /// Offending face index.
        face: usize,
        /// Offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A deformation update changed the vertex count.
    ///
    /// The index buffer is fixed for the lifetime of the mesh, so the
    /// replacement position buffer must have the same length.
    #[error("deformed position buffer has {got} vertices, mesh has {expected}")]
    VertexCountChanged {
        /// Vertex count of the replacement buffer.
        got: usize,
        /// Vertex count the mesh was built with.
        expected: usize,
    },
}

/// Errors raised by bone-chain construction.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Chain has too few or too many joints.
    ///
    /// Chains must have between [`MIN_CHAIN_JOINTS`](crate::MIN_CHAIN_JOINTS)
    /// and [`MAX_CHAIN_JOINTS`](crate::MAX_CHAIN_JOINTS) joints inclusive.
    /// This is a caller precondition, not a recoverable solver state.
    #[error("chain has {got} joints, expected 2 to 4")]
    InvalidLength {
        /// Number of joints supplied.
        got: usize,
    },

    /// A joint position contains a non-finite component.
    #[error("joint {index} has a non-finite position")]
    NonFiniteJoint {
        /// Index of the offending joint.
        index: usize,
    },

    /// Two consecutive joints are coincident, producing a zero-length segment.
    #[error("segment {index} has near-zero length")]
    DegenerateSegment {
        /// Index of the offending segment (between joint `index` and `index + 1`).
        index: usize,
    },
}
