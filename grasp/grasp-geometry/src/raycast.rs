//! Ray/triangle and ray/mesh intersection.

use grasp_types::TriMesh;
use nalgebra::{Point3, Vector3};

/// A ray/triangle intersection record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter at the intersection (`origin + t · dir`).
    pub t: f64,
    /// Barycentric coordinate along the first edge.
    pub u: f64,
    /// Barycentric coordinate along the second edge.
    pub v: f64,
}

impl RayHit {
    /// Full barycentric weights `[wa, wb, wc]` of the hit point.
    #[inline]
    #[must_use]
    pub fn barycentric(&self) -> [f64; 3] {
        [1.0 - self.u - self.v, self.u, self.v]
    }
}

/// Intersect a ray with a triangle (Möller–Trumbore).
///
/// Returns `None` for a miss, a backward hit, or a ray parallel to the
/// triangle plane. The hit carries barycentric coordinates so callers can
/// interpolate vertex attributes at the intersection.
///
/// # Example
///
/// ```
/// use grasp_geometry::ray_triangle_intersect;
/// use nalgebra::{Point3, Vector3};
///
/// let hit = ray_triangle_intersect(
///     Point3::new(0.25, 0.25, 1.0),
///     Vector3::new(0.0, 0.0, -1.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ).unwrap();
/// assert!((hit.t - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn ray_triangle_intersect(
    origin: Point3<f64>,
    dir: Vector3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Option<RayHit> {
    const EPSILON: f64 = 1e-10;

    let edge1 = b - a;
    let edge2 = c - a;

    let h = dir.cross(&edge2);
    let det = edge1.dot(&h);

    // Parallel to the triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    if t > EPSILON {
        Some(RayHit { t, u, v })
    } else {
        None
    }
}

/// Intersect a ray with every triangle of a mesh, returning the nearest hit
/// and its face index.
///
/// Linear sweep over the face buffer; grip-target meshes are small enough
/// that an acceleration structure does not pay for itself.
#[must_use]
pub fn ray_mesh_intersect(
    origin: Point3<f64>,
    dir: Vector3<f64>,
    mesh: &TriMesh,
) -> Option<(usize, RayHit)> {
    let mut best: Option<(usize, RayHit)> = None;
    for (face_idx, tri) in mesh.triangles().enumerate() {
        if let Some(hit) = ray_triangle_intersect(origin, dir, tri.a, tri.b, tri.c) {
            match best {
                Some((_, prev)) if prev.t <= hit.t => {}
                _ => best = Some((face_idx, hit)),
            }
        }
    }
    best
}
