//! Deformable indexed triangle mesh.

use crate::{Aabb, MeshError, Triangle, TypesResult};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh with a fixed index buffer and a replaceable vertex buffer.
///
/// The face indices are validated at construction and never change afterward.
/// Vertex positions may be replaced wholesale to track a deforming surface;
/// the replacement buffer must have the same vertex count. This split is what
/// lets barycentric anchors (surface clusters, contact points) stay valid
/// while the mesh deforms.
///
/// # Winding Order
///
/// Faces use counter-clockwise winding when viewed from outside; face normals
/// point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use grasp_types::{TriMesh, Point3};
///
/// let mut mesh = TriMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// ).unwrap();
///
/// // Deform: lift the third vertex.
/// let mut deformed = mesh.positions().to_vec();
/// deformed[2].z = 0.5;
/// mesh.set_positions(deformed).unwrap();
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriMesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create a mesh from a position buffer and a face index buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Empty`] if there are no faces, or
    /// [`MeshError::IndexOutOfBounds`] if a face references a missing vertex.
    pub fn new(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> TypesResult<Self> {
        if faces.is_empty() {
            return Err(MeshError::Empty);
        }
        let vertex_count = positions.len();
        for (face_idx, face) in faces.iter().enumerate() {
            for &v in face {
                if v as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfBounds {
                        face: face_idx,
                        vertex: v,
                        vertex_count,
                    });
                }
            }
        }
        Ok(Self { positions, faces })
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// `positions` is `[x0, y0, z0, x1, y1, z1, ...]`, `indices` is
    /// `[a0, b0, c0, a1, b1, c1, ...]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Empty`] if either array length is not a multiple
    /// of three or there are no faces, and the same index validation errors
    /// as [`TriMesh::new`].
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> TypesResult<Self> {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Err(MeshError::Empty);
        }
        let points = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(points, faces)
    }

    /// Replace the vertex positions with a deformed buffer.
    ///
    /// The face indices are untouched; the new buffer must have the same
    /// vertex count the mesh was built with.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexCountChanged`] on a count mismatch.
    pub fn set_positions(&mut self, positions: Vec<Point3<f64>>) -> TypesResult<()> {
        if positions.len() != self.positions.len() {
            return Err(MeshError::VertexCountChanged {
                got: positions.len(),
                expected: self.positions.len(),
            });
        }
        self.positions = positions;
        Ok(())
    }

    /// Current vertex positions.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Face index buffer.
    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the triangle for a face index.
    ///
    /// Returns `None` if the index is out of range.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        self.faces.get(face).map(|&[i0, i1, i2]| {
            Triangle::new(
                self.positions[i0 as usize],
                self.positions[i1 as usize],
                self.positions[i2 as usize],
            )
        })
    }

    /// Iterate over all triangles in face order.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| {
            Triangle::new(
                self.positions[i0 as usize],
                self.positions[i1 as usize],
                self.positions[i2 as usize],
            )
        })
    }

    /// Area-weighted centroid of the mesh surface.
    ///
    /// Falls back to the vertex average if the total area is near zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn surface_centroid(&self) -> Point3<f64> {
        let mut weighted = Vector3::zeros();
        let mut total_area = 0.0;
        for tri in self.triangles() {
            let area = tri.area();
            weighted += tri.centroid().coords * area;
            total_area += area;
        }
        if total_area > f64::EPSILON {
            Point3::from(weighted / total_area)
        } else {
            let sum: Vector3<f64> = self.positions.iter().map(|p| p.coords).sum();
            Point3::from(sum / self.positions.len() as f64)
        }
    }

    /// Axis-aligned bounding box of the current positions.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }
}
