//! Triangle-mesh distance field.

use crate::{DistanceField, SdfError, SdfResult, SdfSample};
use grasp_geometry::{closest_point_on_triangle, ray_triangle_intersect};
use grasp_types::{Point3, TriMesh, Vector3};

/// A distance field over a closed triangle mesh.
///
/// Unsigned distance comes from a closest-point sweep over all faces; the
/// sign comes from a parity ray cast (odd crossings = inside), which stays
/// robust near edges and thin features where nearest-face-normal tests flip.
/// The normal is the closest face's normal, flipped to point away from the
/// solid.
///
/// Face normals are precomputed at construction; the mesh snapshot is owned
/// and immutable for the field's lifetime, matching the read-only contract
/// the solvers rely on.
#[derive(Debug, Clone)]
pub struct MeshField {
    mesh: TriMesh,
    face_normals: Vec<Vector3<f64>>,
}

impl MeshField {
    /// Build a field from a mesh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EmptyMesh`] if the mesh has no faces.
    pub fn new(mesh: TriMesh) -> SdfResult<Self> {
        if mesh.face_count() == 0 {
            return Err(SdfError::EmptyMesh);
        }
        let face_normals = mesh
            .triangles()
            .map(|t| t.normal().unwrap_or_else(Vector3::z))
            .collect();
        Ok(Self { mesh, face_normals })
    }

    /// The underlying mesh snapshot.
    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// Closest point on the mesh surface together with its face index.
    #[must_use]
    pub fn closest_point(&self, point: Point3<f64>) -> (Point3<f64>, usize) {
        let mut best = (point, 0);
        let mut best_dist_sq = f64::MAX;
        for (face_idx, tri) in self.mesh.triangles().enumerate() {
            let candidate = closest_point_on_triangle(point, tri.a, tri.b, tri.c);
            let dist_sq = (candidate - point).norm_squared();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = (candidate, face_idx);
            }
        }
        best
    }

    /// Parity ray cast along +X: odd crossing count means inside.
    fn is_point_inside(&self, point: Point3<f64>) -> bool {
        let dir = Vector3::x();
        let mut crossings = 0;
        for tri in self.mesh.triangles() {
            if ray_triangle_intersect(point, dir, tri.a, tri.b, tri.c).is_some() {
                crossings += 1;
            }
        }
        crossings % 2 == 1
    }
}

impl DistanceField for MeshField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let (closest, face) = self.closest_point(point);
        let unsigned = (point - closest).norm();
        let inside = self.is_point_inside(point);

        let face_normal = self.face_normals[face];
        let normal = if unsigned > 1e-9 {
            let toward = (point - closest) / unsigned;
            // Outward = away from the solid regardless of which side we're on
            if inside {
                -toward
            } else {
                toward
            }
        } else {
            face_normal
        };

        let distance = if inside { -unsigned } else { unsigned };
        SdfSample::new(distance, normal)
    }
}
