//! Cluster evaluation on the current vertex buffer.

use crate::{SurfaceCluster, SurfaceError, SurfaceResult};
use grasp_types::{Point3, TriMesh, Vector3};

/// Magnitude below which a projected tangent is considered unstable and the
/// cross-product fallback chain is used instead.
pub const TANGENT_FALLBACK_THRESHOLD: f64 = 0.1;

/// The evaluated surface frame at a cluster's tracked point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Weight-blended world-space position.
    pub position: Point3<f64>,
    /// Normalized weight-blended face normal.
    pub normal: Vector3<f64>,
    /// Unit tangent orthogonal to `normal`.
    pub tangent: Vector3<f64>,
}

impl SurfaceCluster {
    /// Evaluate the cluster against the mesh's current vertex positions.
    ///
    /// - Position: `Σ wᵢ · barycentric-interpolate(anchorᵢ)`.
    /// - Normal: `normalize(Σ wᵢ · face-normalᵢ)`; degenerate faces
    ///   contribute nothing, and an all-degenerate blend falls back to +Z.
    /// - Tangent: each anchor contributes its face's longest edge direction;
    ///   the accumulated direction is projected onto the plane orthogonal to
    ///   the normal. If the projection's magnitude drops below
    ///   [`TANGENT_FALLBACK_THRESHOLD`] (edges nearly parallel to the
    ///   normal), the tangent falls back to `normal × worldUp`, then
    ///   `normal × worldForward` — this keeps the frame finite instead of
    ///   propagating NaNs.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::AnchorOutOfBounds`] if the mesh does not have
    /// a face an anchor references (the mesh is not the topology the cluster
    /// was built against).
    pub fn evaluate(&self, mesh: &TriMesh) -> SurfaceResult<SurfacePoint> {
        let mut position = Vector3::zeros();
        let mut normal_accum = Vector3::zeros();
        let mut edge_accum = Vector3::zeros();

        for anchor in self.anchors() {
            let tri = mesh
                .triangle(anchor.face as usize)
                .ok_or(SurfaceError::AnchorOutOfBounds {
                    face: anchor.face,
                    face_count: mesh.face_count(),
                })?;

            let w = anchor.weight;
            let bary = anchor.barycentric;
            position +=
                (tri.a.coords * bary[0] + tri.b.coords * bary[1] + tri.c.coords * bary[2]) * w;

            if let Some(n) = tri.normal() {
                normal_accum += n * w;
            }

            // Longest edge gives the most numerically stable direction as
            // triangles stretch under deformation.
            edge_accum += tri.longest_edge() * w;
        }

        let normal = normal_accum
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::z);

        let tangent = stable_tangent(normal, edge_accum);

        Ok(SurfacePoint {
            position: Point3::from(position),
            normal,
            tangent,
        })
    }
}

/// Project the accumulated edge direction into the tangent plane, falling
/// back to cross-product constructions when the projection degenerates.
fn stable_tangent(normal: Vector3<f64>, edge_accum: Vector3<f64>) -> Vector3<f64> {
    let edge_dir = edge_accum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);

    let projected = edge_dir - normal * edge_dir.dot(&normal);
    if projected.norm() >= TANGENT_FALLBACK_THRESHOLD {
        if let Some(t) = projected.try_normalize(f64::EPSILON) {
            return t;
        }
    }

    // Edge direction nearly parallel to the normal: construct from world axes
    let from_up = normal.cross(&Vector3::y());
    if let Some(t) = from_up.try_normalize(TANGENT_FALLBACK_THRESHOLD) {
        return t;
    }
    let from_forward = normal.cross(&Vector3::z());
    from_forward
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::x)
}
