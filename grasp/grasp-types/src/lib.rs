//! Core types for the grasp solver workspace.
//!
//! This crate provides the foundational types consumed by every solver crate:
//!
//! - [`TriMesh`] - A triangle mesh with a fixed index buffer and a
//!   replaceable (deformable) vertex buffer
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`BoneChain`] - An ordered joint chain with fixed segment lengths
//! - [`JointLimits`] / [`FingerLimits`] - Immutable angular limit configuration
//!
//! # Layer 0 Crate
//!
//! This crate has no engine, GUI, or GPU dependencies. It can be used in CLI
//! tools, servers, WASM, and bindings for other runtimes.
//!
//! # Units & Conventions
//!
//! All coordinates are `f64` **meters**, angles are **radians**. The
//! coordinate system is right-handed, face winding is counter-clockwise when
//! viewed from outside, normals point outward by the right-hand rule.
//!
//! # Deformation Contract
//!
//! [`TriMesh`] separates topology from geometry: the face index buffer is
//! fixed at construction while vertex positions may be replaced every frame
//! via [`TriMesh::set_positions`]. Anything holding face indices (surface
//! clusters, contact anchors) stays valid across deformation.
//!
//! # Example
//!
//! ```
//! use grasp_types::{TriMesh, Point3, BoneChain, BoneJoint};
//! use nalgebra::UnitQuaternion;
//!
//! let mesh = TriMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! ).unwrap();
//! assert_eq!(mesh.face_count(), 1);
//!
//! let chain = BoneChain::from_rest_pose(vec![
//!     BoneJoint::new(Point3::new(0.0, 0.0, 0.0), UnitQuaternion::identity()),
//!     BoneJoint::new(Point3::new(0.03, 0.0, 0.0), UnitQuaternion::identity()),
//!     BoneJoint::new(Point3::new(0.055, 0.0, 0.0), UnitQuaternion::identity()),
//! ]).unwrap();
//! assert!((chain.total_length() - 0.055).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod chain;
mod error;
mod limits;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use chain::{BoneChain, BoneJoint, MAX_CHAIN_JOINTS, MIN_CHAIN_JOINTS};
pub use error::{ChainError, MeshError, TypesResult};
pub use limits::{FingerLimits, JointLimits};
pub use mesh::TriMesh;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
