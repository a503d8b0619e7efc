//! Analytic distance fields for collider primitives.

use crate::{DistanceField, SdfError, SdfResult, SdfSample};
use grasp_geometry::closest_point_on_segment;
use grasp_types::Aabb;
use nalgebra::{Point3, Vector3};

/// A solid sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereField {
    center: Point3<f64>,
    radius: f64,
}

impl SphereField {
    /// Create a sphere field.
    ///
    /// A non-positive radius is clamped to a tiny epsilon rather than
    /// rejected; prefer [`SphereField::try_new`] to surface the error.
    #[must_use]
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(f64::EPSILON),
        }
    }

    /// Create a sphere field, rejecting non-positive radii.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidDimension`] for `radius <= 0`.
    pub fn try_new(center: Point3<f64>, radius: f64) -> SdfResult<Self> {
        if radius <= 0.0 {
            return Err(SdfError::InvalidDimension {
                primitive: "sphere",
                dimension: "radius",
                value: radius,
            });
        }
        Ok(Self { center, radius })
    }

    /// Sphere center.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Sphere radius.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
}

impl DistanceField for SphereField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let offset = point - self.center;
        let normal = offset.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y);
        SdfSample::new(offset.norm() - self.radius, normal)
    }
}

/// An axis-aligned solid box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxField {
    bounds: Aabb,
}

impl BoxField {
    /// Create a box field from an AABB.
    #[inline]
    #[must_use]
    pub const fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Create a box field from center and half extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            bounds: Aabb::new(center - half_extents, center + half_extents),
        }
    }

    /// The box bounds.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl DistanceField for BoxField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let b = &self.bounds;
        let surface = b.closest_surface_point(&point);
        let to_surface = point - surface;
        let dist = to_surface.norm();

        if b.contains(&point) {
            // Inside: normal is the nearest face's outward direction
            SdfSample::new(-dist, b.face_normal_toward(&point))
        } else {
            let normal = to_surface
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(|| b.face_normal_toward(&point));
            SdfSample::new(dist, normal)
        }
    }
}

/// A finite solid cylinder around the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderField {
    center: Point3<f64>,
    radius: f64,
    half_height: f64,
}

impl CylinderField {
    /// Create a Y-axis cylinder from its center, radius, and half height.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidDimension`] for non-positive radius or
    /// half height.
    pub fn new(center: Point3<f64>, radius: f64, half_height: f64) -> SdfResult<Self> {
        if radius <= 0.0 {
            return Err(SdfError::InvalidDimension {
                primitive: "cylinder",
                dimension: "radius",
                value: radius,
            });
        }
        if half_height <= 0.0 {
            return Err(SdfError::InvalidDimension {
                primitive: "cylinder",
                dimension: "half height",
                value: half_height,
            });
        }
        Ok(Self {
            center,
            radius,
            half_height,
        })
    }

    /// Cylinder center.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Cylinder radius.
    #[inline]
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Half height along Y.
    #[inline]
    #[must_use]
    pub const fn half_height(&self) -> f64 {
        self.half_height
    }
}

impl DistanceField for CylinderField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let local = point - self.center;
        let radial = Vector3::new(local.x, 0.0, local.z);
        let radial_len = radial.norm();

        // 2D distance to the cylinder's cross-section rectangle
        let dx = radial_len - self.radius;
        let dy = local.y.abs() - self.half_height;

        let radial_dir = radial
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        let cap_dir = Vector3::new(0.0, local.y.signum(), 0.0);

        if dx <= 0.0 && dy <= 0.0 {
            // Inside: exit through the nearer of wall and cap
            if dx > dy {
                SdfSample::new(dx, radial_dir)
            } else {
                SdfSample::new(dy, cap_dir)
            }
        } else {
            let ox = dx.max(0.0);
            let oy = dy.max(0.0);
            let dist = (ox * ox + oy * oy).sqrt();
            let normal = (radial_dir * ox + cap_dir * oy)
                .try_normalize(f64::EPSILON)
                .unwrap_or(radial_dir);
            SdfSample::new(dist, normal)
        }
    }
}

/// A solid capsule: a segment swept by a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleField {
    start: Point3<f64>,
    end: Point3<f64>,
    radius: f64,
}

impl CapsuleField {
    /// Create a capsule field.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::InvalidDimension`] for a non-positive radius.
    pub fn new(start: Point3<f64>, end: Point3<f64>, radius: f64) -> SdfResult<Self> {
        if radius <= 0.0 {
            return Err(SdfError::InvalidDimension {
                primitive: "capsule",
                dimension: "radius",
                value: radius,
            });
        }
        Ok(Self { start, end, radius })
    }
}

impl DistanceField for CapsuleField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let on_axis = closest_point_on_segment(point, self.start, self.end);
        let offset = point - on_axis;
        let normal = offset.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y);
        SdfSample::new(offset.norm() - self.radius, normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_distance_and_normal() {
        let s = SphereField::new(Point3::new(1.0, 0.0, 0.0), 0.5);
        let sample = s.sample(Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(sample.distance, 1.5, epsilon = 1e-12);
        assert_relative_eq!(sample.normal.x, 1.0, epsilon = 1e-12);

        // Inside
        let sample = s.sample(Point3::new(1.2, 0.0, 0.0));
        assert_relative_eq!(sample.distance, -0.3, epsilon = 1e-12);
    }

    #[test]
    fn sphere_rejects_bad_radius() {
        assert!(SphereField::try_new(Point3::origin(), 0.0).is_err());
        assert!(SphereField::try_new(Point3::origin(), -1.0).is_err());
    }

    #[test]
    fn box_outside_face_distance() {
        let b = BoxField::from_center(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        let sample = b.sample(Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(sample.distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(sample.normal.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn box_corner_distance() {
        let b = BoxField::from_center(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        let sample = b.sample(Point3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(sample.distance, 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn box_inside_negative_distance() {
        let b = BoxField::from_center(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));
        let sample = b.sample(Point3::new(0.9, 0.0, 0.0));
        assert_relative_eq!(sample.distance, -0.1, epsilon = 1e-12);
        assert_relative_eq!(sample.normal.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_wall_and_cap() {
        let c = CylinderField::new(Point3::origin(), 1.0, 2.0).unwrap();

        let wall = c.sample(Point3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(wall.distance, 2.0, epsilon = 1e-12);
        assert_relative_eq!(wall.normal.x, 1.0, epsilon = 1e-12);

        let cap = c.sample(Point3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(cap.distance, 3.0, epsilon = 1e-12);
        assert_relative_eq!(cap.normal.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_inside_picks_nearest_exit() {
        let c = CylinderField::new(Point3::origin(), 1.0, 2.0).unwrap();
        // Nearer the wall than the caps
        let sample = c.sample(Point3::new(0.9, 0.0, 0.0));
        assert_relative_eq!(sample.distance, -0.1, epsilon = 1e-12);
        assert_relative_eq!(sample.normal.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_edge_distance() {
        let c = CylinderField::new(Point3::origin(), 1.0, 1.0).unwrap();
        // Diagonal from the rim: sqrt(1^2 + 1^2) away from the rim circle
        let sample = c.sample(Point3::new(2.0, 2.0, 0.0));
        assert_relative_eq!(sample.distance, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn capsule_midpoint_and_end() {
        let cap = CapsuleField::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            0.25,
        )
        .unwrap();

        let mid = cap.sample(Point3::new(0.5, 1.0, 0.0));
        assert_relative_eq!(mid.distance, 0.75, epsilon = 1e-12);

        let beyond = cap.sample(Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(beyond.distance, 0.75, epsilon = 1e-12);
        assert_relative_eq!(beyond.normal.x, 1.0, epsilon = 1e-12);
    }
}
