//! Geometric primitives for the grasp solver.
//!
//! This crate provides the low-level numerical building blocks shared by the
//! surface, SDF, and planning crates:
//!
//! - Closest point on a triangle (with barycentric coordinates)
//! - Ray/triangle intersection (Möller–Trumbore, barycentrics returned)
//! - Barycentric coordinate solve with a degenerate-triangle fallback
//! - Point/segment distance queries for capsule sampling
//! - Fibonacci-sphere direction sampling
//! - Radial basis function (RBF) interpolation of sparse displacements
//!
//! # Layer 0
//!
//! No engine, GUI, or GPU dependencies.
//!
//! # Example
//!
//! ```
//! use grasp_geometry::{barycentric_coordinates, closest_point_on_triangle};
//! use nalgebra::Point3;
//!
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(1.0, 0.0, 0.0);
//! let c = Point3::new(0.0, 1.0, 0.0);
//!
//! let p = closest_point_on_triangle(Point3::new(0.25, 0.25, 1.0), a, b, c);
//! assert!((p.z - 0.0).abs() < 1e-12);
//!
//! let bary = barycentric_coordinates(a, a, b, c);
//! assert!((bary[0] - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod barycentric;
mod closest;
mod error;
mod raycast;
mod rbf;
mod sampling;

pub use barycentric::{barycentric_coordinates, barycentric_interpolate, DEGENERATE_DENOMINATOR};
pub use closest::{
    closest_point_on_segment, closest_point_on_triangle, closest_point_on_triangle_barycentric,
    point_segment_distance_squared,
};
pub use error::{GeometryError, GeometryResult};
pub use raycast::{ray_mesh_intersect, ray_triangle_intersect, RayHit};
pub use rbf::{RbfInterpolator, RbfKernel};
pub use sampling::fibonacci_sphere;
