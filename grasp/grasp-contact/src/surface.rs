//! Grip surface abstraction: what the digits are trying to touch.

use grasp_geometry::closest_point_on_triangle_barycentric;
use grasp_sdf::{BoxField, CylinderField, DistanceField, SphereField};
use grasp_types::{Aabb, Point3, TriMesh, Vector3};

/// A projected point on the grip surface with its outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Position on the surface.
    pub position: Point3<f64>,
    /// Outward unit normal at the position.
    pub normal: Vector3<f64>,
    /// Face index when the surface is a mesh.
    pub face: Option<usize>,
}

/// A triangle mesh prepared for contact queries: per-vertex normals are
/// precomputed so projections get smoothly interpolated normals instead of
/// faceted face normals.
#[derive(Debug, Clone)]
pub struct MeshSurface {
    mesh: TriMesh,
    vertex_normals: Vec<Vector3<f64>>,
}

impl MeshSurface {
    /// Prepare a mesh for contact queries.
    ///
    /// Vertex normals are accumulated area-weighted from the incident faces,
    /// so larger triangles influence the shared normal more.
    #[must_use]
    pub fn new(mesh: TriMesh) -> Self {
        let mut vertex_normals = vec![Vector3::zeros(); mesh.vertex_count()];
        for (face, tri) in mesh.faces().iter().zip(mesh.triangles()) {
            // Unnormalized cross product is area-weighted already
            let n = tri.normal_unnormalized();
            for &v in face {
                vertex_normals[v as usize] += n;
            }
        }
        for n in &mut vertex_normals {
            *n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        }
        Self {
            mesh,
            vertex_normals,
        }
    }

    /// The underlying mesh.
    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// Barycentrically interpolated vertex normal on a face.
    ///
    /// Falls back to the face normal if the interpolation degenerates, and
    /// to +Z if the face index is out of range.
    #[must_use]
    pub fn interpolated_normal(&self, face: usize, barycentric: [f64; 3]) -> Vector3<f64> {
        let Some(indices) = self.mesh.faces().get(face) else {
            return Vector3::z();
        };
        (self.vertex_normals[indices[0] as usize] * barycentric[0]
            + self.vertex_normals[indices[1] as usize] * barycentric[1]
            + self.vertex_normals[indices[2] as usize] * barycentric[2])
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| {
                self.mesh
                    .triangle(face)
                    .and_then(|t| t.normal())
                    .unwrap_or_else(Vector3::z)
            })
    }

    /// Closest point on the mesh with barycentrically interpolated normal.
    #[must_use]
    pub fn project(&self, point: Point3<f64>) -> SurfaceHit {
        let mut best_dist_sq = f64::MAX;
        let mut best = SurfaceHit {
            position: point,
            normal: Vector3::z(),
            face: None,
        };

        for (face_idx, (face, tri)) in
            self.mesh.faces().iter().zip(self.mesh.triangles()).enumerate()
        {
            let (closest, bary) =
                closest_point_on_triangle_barycentric(point, tri.a, tri.b, tri.c);
            let dist_sq = (closest - point).norm_squared();
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                let normal = (self.vertex_normals[face[0] as usize] * bary[0]
                    + self.vertex_normals[face[1] as usize] * bary[1]
                    + self.vertex_normals[face[2] as usize] * bary[2])
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(|| tri.normal().unwrap_or_else(Vector3::z));
                best = SurfaceHit {
                    position: closest,
                    normal,
                    face: Some(face_idx),
                };
            }
        }

        best
    }
}

/// The surface a grasp is planned against.
///
/// The variants encode the projection priority chain: exact analytic
/// colliders project in closed form, meshes use the triangle sweep with
/// interpolated normals, and a bare bounding box is the last-resort
/// fallback when nothing better is known about the object.
#[derive(Debug)]
pub enum GripSurface {
    /// Exact sphere collider.
    Sphere(SphereField),
    /// Exact Y-axis cylinder collider.
    Cylinder(CylinderField),
    /// Exact axis-aligned box collider.
    Box(BoxField),
    /// Triangle mesh with interpolated normals.
    Mesh(MeshSurface),
    /// Bounding-box fallback.
    Bounds(Aabb),
}

impl GripSurface {
    /// Prepare a mesh surface.
    #[must_use]
    pub fn from_mesh(mesh: TriMesh) -> Self {
        Self::Mesh(MeshSurface::new(mesh))
    }

    /// The point candidates aim for when shooting their initial guess ray.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        match self {
            Self::Sphere(s) => s.center(),
            Self::Cylinder(c) => c.center(),
            Self::Box(b) => b.bounds().center(),
            Self::Mesh(m) => m.mesh().surface_centroid(),
            Self::Bounds(b) => b.center(),
        }
    }

    /// Project a point onto the surface, returning position and outward
    /// normal.
    #[must_use]
    pub fn project(&self, point: Point3<f64>) -> SurfaceHit {
        match self {
            Self::Sphere(s) => {
                let sample = s.sample(point);
                SurfaceHit {
                    position: point - sample.normal * sample.distance,
                    normal: sample.normal,
                    face: None,
                }
            }
            Self::Cylinder(c) => {
                let sample = c.sample(point);
                SurfaceHit {
                    position: point - sample.normal * sample.distance,
                    normal: sample.normal,
                    face: None,
                }
            }
            Self::Box(b) => {
                let position = b.bounds().closest_surface_point(&point);
                let normal = b.sample(point).normal;
                SurfaceHit {
                    position,
                    normal,
                    face: None,
                }
            }
            Self::Mesh(m) => m.project(point),
            Self::Bounds(bounds) => {
                let position = bounds.closest_surface_point(&point);
                SurfaceHit {
                    position,
                    normal: bounds.face_normal_toward(&point),
                    face: None,
                }
            }
        }
    }

    /// Whether this surface has a closed-form placement shortcut.
    #[must_use]
    pub const fn has_primitive_shortcut(&self) -> bool {
        matches!(self, Self::Sphere(_) | Self::Cylinder(_) | Self::Box(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn octahedron() -> TriMesh {
        TriMesh::new(
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, -1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, -1.0),
            ],
            vec![
                [0, 2, 4],
                [2, 1, 4],
                [1, 3, 4],
                [3, 0, 4],
                [2, 0, 5],
                [1, 2, 5],
                [3, 1, 5],
                [0, 3, 5],
            ],
        )
        .unwrap()
    }

    #[test]
    fn sphere_projection_lands_on_surface() {
        let surface = GripSurface::Sphere(SphereField::new(Point3::origin(), 0.5));
        let hit = surface.project(Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(hit.position.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mesh_projection_interpolates_normal() {
        let surface = GripSurface::from_mesh(octahedron());
        // Project toward the +X vertex: the interpolated normal there is the
        // average of 4 face normals, which points along +X
        let hit = surface.project(Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(hit.position.x, 1.0, epsilon = 1e-12);
        assert!(hit.normal.x > 0.99);
        assert!(hit.face.is_some());
    }

    #[test]
    fn mesh_centroid_is_inside() {
        let surface = GripSurface::from_mesh(octahedron());
        let c = surface.centroid();
        assert!(c.coords.norm() < 0.1);
    }

    #[test]
    fn bounds_fallback_projects_to_box() {
        let surface = GripSurface::Bounds(Aabb::new(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
        ));
        let hit = surface.project(Point3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(hit.position.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn shortcut_detection() {
        assert!(GripSurface::Sphere(SphereField::new(Point3::origin(), 1.0))
            .has_primitive_shortcut());
        assert!(!GripSurface::from_mesh(octahedron()).has_primitive_shortcut());
    }
}
