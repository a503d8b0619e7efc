//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// # Example
///
/// ```
/// use grasp_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
///
/// // Closest surface point for an outside query
/// let p = aabb.closest_surface_point(&Point3::new(3.0, 1.0, 1.0));
/// assert!((p.x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a box from two corners, correcting swapped components.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty (inverted) box, useful as a fold seed.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Build a box covering an iterator of points.
    ///
    /// Returns an empty box for an empty iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    /// Whether the box is empty (never expanded).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include a point.
    pub fn expand_to_include(&mut self, p: &Point3<f64>) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    /// Whether the box contains a point (inclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Half extents along each axis.
    #[inline]
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        (self.max - self.min) * 0.5
    }

    /// Closest point on the box *surface* to a query point.
    ///
    /// For an outside query this is the usual clamp; for an inside query the
    /// point is projected onto the nearest face so the result always lies on
    /// the boundary.
    #[must_use]
    pub fn closest_surface_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let clamped = Point3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        );
        if clamped != *p {
            return clamped;
        }

        // Inside: push to the face with the smallest exit distance.
        let dists = [
            (clamped.x - self.min.x, 0, self.min.x),
            (self.max.x - clamped.x, 0, self.max.x),
            (clamped.y - self.min.y, 1, self.min.y),
            (self.max.y - clamped.y, 1, self.max.y),
            (clamped.z - self.min.z, 2, self.min.z),
            (self.max.z - clamped.z, 2, self.max.z),
        ];
        let mut best = dists[0];
        for d in &dists[1..] {
            if d.0 < best.0 {
                best = *d;
            }
        }
        let mut out = clamped;
        match best.1 {
            0 => out.x = best.2,
            1 => out.y = best.2,
            _ => out.z = best.2,
        }
        out
    }

    /// Outward normal of the face nearest to a point.
    ///
    /// Degenerate at corners; any adjacent face normal is acceptable there.
    #[must_use]
    pub fn face_normal_toward(&self, p: &Point3<f64>) -> Vector3<f64> {
        let c = self.center();
        let h = self.half_extents();
        let d = p - c;
        // Normalize by half extent so elongated boxes pick the right face.
        let nx = if h.x > f64::EPSILON { d.x / h.x } else { 0.0 };
        let ny = if h.y > f64::EPSILON { d.y / h.y } else { 0.0 };
        let nz = if h.z > f64::EPSILON { d.z / h.z } else { 0.0 };

        if nx.abs() >= ny.abs() && nx.abs() >= nz.abs() {
            Vector3::new(nx.signum(), 0.0, 0.0)
        } else if ny.abs() >= nz.abs() {
            Vector3::new(0.0, ny.signum(), 0.0)
        } else {
            Vector3::new(0.0, 0.0, nz.signum())
        }
    }
}
