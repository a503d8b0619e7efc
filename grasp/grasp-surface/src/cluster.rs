//! Cluster construction: nearest-K triangle anchoring.

use crate::{SurfaceError, SurfaceResult};
use grasp_geometry::closest_point_on_triangle_barycentric;
use grasp_types::{Point3, TriMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Guard added to anchor distances before inversion so an exact surface hit
/// does not divide by zero.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// One triangle anchor inside a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceAnchor {
    /// Face index into the mesh's (fixed) index buffer.
    pub face: u32,
    /// Barycentric coordinates of the anchored point within the face.
    pub barycentric: [f64; 3],
    /// Blend weight; all weights in a cluster sum to 1.
    pub weight: f64,
}

/// A weighted multi-triangle anchor set tracking a point on a deformable
/// surface.
///
/// Built once per tracked point, evaluated every frame the mesh deforms.
/// The cluster stores face indices and barycentric coordinates only, so it
/// stays valid for any deformation that preserves the mesh topology.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceCluster {
    anchors: Vec<SurfaceAnchor>,
}

impl SurfaceCluster {
    /// Build a cluster from the `k` nearest triangles to `query`.
    ///
    /// Each anchor records the closest point on its triangle in barycentric
    /// form; anchor weights are `1 / (distance + ε)`, normalized to sum 1, so
    /// nearer triangles dominate and an exact hit collapses the cluster onto
    /// one face without dividing by zero.
    ///
    /// `search_radius` optionally discards triangles whose closest point lies
    /// farther than the radius from the query.
    ///
    /// # Errors
    ///
    /// - [`SurfaceError::EmptyMesh`] if the mesh has no faces.
    /// - [`SurfaceError::NoTriangleInRadius`] if the radius excludes every
    ///   triangle.
    pub fn build(
        mesh: &TriMesh,
        query: Point3<f64>,
        k: usize,
        search_radius: Option<f64>,
    ) -> SurfaceResult<Self> {
        if mesh.face_count() == 0 {
            return Err(SurfaceError::EmptyMesh);
        }
        let k = k.max(1);

        // (distance, face, barycentric) for every candidate triangle
        let mut candidates: Vec<(f64, u32, [f64; 3])> = Vec::with_capacity(mesh.face_count());
        for (face_idx, tri) in mesh.triangles().enumerate() {
            let (closest, bary) =
                closest_point_on_triangle_barycentric(query, tri.a, tri.b, tri.c);
            let distance = (closest - query).norm();
            if let Some(radius) = search_radius {
                if distance > radius {
                    continue;
                }
            }
            #[allow(clippy::cast_possible_truncation)]
            candidates.push((distance, face_idx as u32, bary));
        }

        if candidates.is_empty() {
            return Err(SurfaceError::NoTriangleInRadius {
                radius: search_radius.unwrap_or(f64::INFINITY),
            });
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(k);

        let raw_weights: Vec<f64> = candidates
            .iter()
            .map(|(d, _, _)| 1.0 / (d + WEIGHT_EPSILON))
            .collect();
        let total: f64 = raw_weights.iter().sum();

        let anchors = candidates
            .into_iter()
            .zip(raw_weights)
            .map(|((_, face, barycentric), w)| SurfaceAnchor {
                face,
                barycentric,
                weight: w / total,
            })
            .collect();

        Ok(Self { anchors })
    }

    /// The cluster's anchors.
    #[inline]
    #[must_use]
    pub fn anchors(&self) -> &[SurfaceAnchor] {
        &self.anchors
    }

    /// Number of anchors.
    #[inline]
    #[must_use]
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_mesh() -> TriMesh {
        // Two triangles forming a unit quad in the XY plane
        TriMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn weights_sum_to_one() {
        let mesh = quad_mesh();
        let cluster = SurfaceCluster::build(&mesh, Point3::new(0.5, 0.5, 0.2), 2, None).unwrap();
        let total: f64 = cluster.anchors().iter().map(|a| a.weight).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert_eq!(cluster.anchor_count(), 2);
    }

    #[test]
    fn nearest_triangle_dominates() {
        let mesh = quad_mesh();
        // Near face 0's interior, far from face 1
        let cluster = SurfaceCluster::build(&mesh, Point3::new(0.9, 0.1, 0.0), 2, None).unwrap();
        let a0 = &cluster.anchors()[0];
        assert_eq!(a0.face, 0);
        assert!(a0.weight > 0.9);
    }

    #[test]
    fn radius_excludes_far_triangles() {
        let mesh = quad_mesh();
        let result = SurfaceCluster::build(&mesh, Point3::new(5.0, 5.0, 5.0), 2, Some(0.1));
        assert!(matches!(
            result,
            Err(SurfaceError::NoTriangleInRadius { .. })
        ));
    }

    #[test]
    fn k_larger_than_face_count_is_clamped() {
        let mesh = quad_mesh();
        let cluster = SurfaceCluster::build(&mesh, Point3::new(0.5, 0.5, 0.0), 10, None).unwrap();
        assert_eq!(cluster.anchor_count(), 2);
    }

    #[test]
    fn exact_hit_does_not_divide_by_zero() {
        let mesh = quad_mesh();
        let cluster = SurfaceCluster::build(&mesh, Point3::new(0.6, 0.2, 0.0), 1, None).unwrap();
        let a = &cluster.anchors()[0];
        assert!(a.weight.is_finite());
        assert_relative_eq!(a.weight, 1.0, epsilon = 1e-12);
    }
}
