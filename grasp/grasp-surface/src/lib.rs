//! Surface clusters: stable point tracking on deforming meshes.
//!
//! A [`SurfaceCluster`] anchors a point to a weighted set of mesh triangles
//! via barycentric coordinates. Because the anchors reference the mesh's
//! *topology* (which is fixed) rather than its geometry (which deforms), the
//! cluster can be re-evaluated every frame to recover a consistent position,
//! normal, and tangent as the underlying surface moves.
//!
//! # Example
//!
//! ```
//! use grasp_surface::SurfaceCluster;
//! use grasp_types::{TriMesh, Point3};
//!
//! let mut mesh = TriMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! ).unwrap();
//!
//! let cluster = SurfaceCluster::build(&mesh, Point3::new(0.3, 0.3, 0.1), 1, None).unwrap();
//! let before = cluster.evaluate(&mesh).unwrap();
//!
//! // Deform: translate the whole mesh up; the tracked point follows.
//! let moved = mesh.positions().iter().map(|p| Point3::new(p.x, p.y, p.z + 1.0)).collect();
//! mesh.set_positions(moved).unwrap();
//! let after = cluster.evaluate(&mesh).unwrap();
//! assert!((after.position.z - before.position.z - 1.0).abs() < 1e-12);
//! ```

mod cluster;
mod error;
mod evaluate;

pub use cluster::{SurfaceAnchor, SurfaceCluster, WEIGHT_EPSILON};
pub use error::{SurfaceError, SurfaceResult};
pub use evaluate::{SurfacePoint, TANGENT_FALLBACK_THRESHOLD};
