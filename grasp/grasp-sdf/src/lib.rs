//! Signed distance fields for the grasp solver.
//!
//! A [`DistanceField`] answers one question: how far is a point from the
//! nearest surface, and which way is out? Distances are positive outside,
//! negative inside; the normal always points away from the solid.
//!
//! Implementations:
//!
//! - [`SphereField`], [`BoxField`], [`CylinderField`], [`CapsuleField`] -
//!   exact analytic fields for collider primitives
//! - [`MeshField`] - triangle-mesh field (closest-point distance, parity-ray
//!   sign)
//! - [`UnionField`] - union of solids by minimum distance
//!
//! # Example
//!
//! ```
//! use grasp_sdf::{DistanceField, SphereField};
//! use nalgebra::Point3;
//!
//! let sphere = SphereField::new(Point3::origin(), 1.0);
//! let sample = sphere.sample(Point3::new(2.0, 0.0, 0.0));
//! assert!((sample.distance - 1.0).abs() < 1e-12);
//! assert!((sample.normal.x - 1.0).abs() < 1e-12);
//! ```

mod error;
mod field;
mod mesh;
mod primitives;
mod union;

pub use error::{SdfError, SdfResult};
pub use field::{DistanceField, SdfSample};
pub use mesh::MeshField;
pub use primitives::{BoxField, CapsuleField, CylinderField, SphereField};
pub use union::UnionField;
